use std::time::Duration;

use chrono::NaiveDate;
use http::StatusCode;

/// Broad classification of [`Error`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The caller passed something unusable, nothing has been sent.
    InvalidArgument,

    /// The request could not be completed: connection failure, timeout, broken body stream.
    Transport,

    /// The server answered, but signalled a failure.
    Protocol,

    /// The response body does not match the expected layout.
    Decode,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum Error {
    #[display("invalid date range: `{from}` is after `{to}`")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[display("failed to encode the query")]
    InvalidQuery(serde_qs::Error),

    #[display("failed to build the request")]
    InvalidRequest(http::Error),

    #[display("failed to call the API")]
    Transport(TransportError),

    #[display("the call timed out after {_0:?}")]
    TimedOut(#[error(not(source))] Duration),

    /// The API always answers with `200 OK`, an error is only marked by the `ERR` body prefix.
    #[display("the API responded with an error ({status}): {body:?}")]
    ErrorMarker { status: StatusCode, body: String },

    #[display("unexpected HTTP status: {_0}")]
    UnexpectedStatus(#[error(not(source))] StatusCode),

    #[display("failed to deserialize the response JSON")]
    Json(serde_json::Error),

    #[display("response body is too short")]
    TruncatedBody,

    #[display("epoch `{_0}` is missing from the device directory")]
    UnknownEpoch(#[error(not(source))] String),

    #[display("invalid device map on `{date}`")]
    InvalidDeviceMap { date: String },

    #[display("invalid value map on `{date}` for device `{device_id}`")]
    InvalidValueMap { date: String, device_id: String },

    #[display("non-string value on `{date}` for device `{device_id}`, channel `{channel_id}`")]
    InvalidValue { date: String, device_id: String, channel_id: String },

    #[display("reading on `{date}` for unknown device `{device_id}`")]
    UnknownDevice { date: String, device_id: String },
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDateRange { .. } | Self::InvalidQuery(_) | Self::InvalidRequest(_) => {
                ErrorKind::InvalidArgument
            }
            Self::Transport(_) | Self::TimedOut(_) => ErrorKind::Transport,
            Self::ErrorMarker { .. } | Self::UnexpectedStatus(_) => ErrorKind::Protocol,
            Self::Json(_)
            | Self::TruncatedBody
            | Self::UnknownEpoch(_)
            | Self::InvalidDeviceMap { .. }
            | Self::InvalidValueMap { .. }
            | Self::InvalidValue { .. }
            | Self::UnknownDevice { .. } => ErrorKind::Decode,
        }
    }
}

impl From<TransportError> for Error {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}

/// Failure to execute a request or to stream its response body.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TransportError {
    #[display("HTTP request failed")]
    Http(reqwest::Error),

    /// Custom transports report their failures through this one.
    #[display("I/O failed")]
    Io(std::io::Error),
}
