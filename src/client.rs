use std::{collections::HashMap, sync::Arc, time::Duration};

use bon::Builder;
use chrono::{Local, NaiveDate};
use http::{StatusCode, header};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::Error,
    models::DayValues,
    response::{self, DayValuesResponse},
    transport::{PeekableBody, Transport},
};

pub const BASE_URL: &str = "https://stromberg.solarlog-web.eu/api";

/// Date layout used by the API, in [`chrono::format::strftime`] notation.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Failed requests are still `200 OK`, but their body starts with this marker.
const ERROR_MARKER: &[u8] = b"ERR";

#[must_use]
#[derive(Default, Builder)]
pub struct Options {
    /// Replaces the default [`reqwest::Client`].
    transport: Option<Arc<dyn Transport>>,

    /// Bounds the entire call, including the body read.
    timeout: Option<Duration>,
}

/// Solar-Log WEB API client.
///
/// Holds no per-call state, so it may be shared across tasks as long as the transport allows.
pub struct Client {
    user: String,
    password: String,
    solarlog_id: u32,
    transport: Arc<dyn Transport>,
    timeout: Option<Duration>,
}

impl Client {
    /// # Errors
    ///
    /// When no transport is provided and the default HTTP client could not be built.
    pub fn try_new(
        user: impl Into<String>,
        password: impl Into<String>,
        solarlog_id: u32,
        options: Options,
    ) -> Result<Self, Error> {
        let transport = match options.transport {
            Some(transport) => transport,
            None => Arc::new(
                reqwest::Client::builder()
                    .user_agent("solarlog")
                    .build()
                    .map_err(|error| Error::Transport(error.into()))?,
            ),
        };
        Ok(Self {
            user: user.into(),
            password: password.into(),
            solarlog_id,
            transport,
            timeout: options.timeout,
        })
    }

    /// Fetch today's readings of all devices connected to the Solar-Log.
    ///
    /// # Errors
    ///
    /// See [`Client::fetch_day_values`].
    pub async fn fetch_current_day(&self) -> Result<HashMap<String, DayValues>, Error> {
        let today = Local::now().date_naive();
        self.call(today, today).await
    }

    /// Fetch readings of all devices connected to the Solar-Log for the inclusive date range.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDateRange`] when `from` is after `to`, nothing is sent in this case
    /// - transport errors, including [`Error::TimedOut`]
    /// - protocol errors when the API signals a failure
    /// - decoding errors when the response does not have the expected shape
    pub async fn fetch_day_values(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<String, DayValues>, Error> {
        if from > to {
            return Err(Error::InvalidDateRange { from, to });
        }
        self.call(from, to).await
    }

    #[instrument(skip_all, fields(solarlog_id = self.solarlog_id, %from, %to))]
    async fn call(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<String, DayValues>, Error> {
        info!("fetching…");
        let request = self.build_request(from, to)?;
        let raw = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.execute(request))
                .await
                .map_err(|_| Error::TimedOut(timeout))??,
            None => self.execute(request).await?,
        };
        let day_values = response::decode(raw)?;
        info!(n_devices = day_values.len(), "fetched");
        Ok(day_values)
    }

    fn build_request(&self, from: NaiveDate, to: NaiveDate) -> Result<http::Request<()>, Error> {
        #[derive(Serialize)]
        struct GetDayValuesQuery<'a> {
            username: &'a str,
            password: &'a str,
            format: &'static str,
            function: &'static str,
            solarlog: u32,
            date_from: String,
            date_to: String,
        }

        let query = GetDayValuesQuery {
            username: &self.user,
            password: &self.password,
            format: "json",
            function: "getDayValues",
            solarlog: self.solarlog_id,
            date_from: from.format(DATE_FORMAT).to_string(),
            date_to: to.format(DATE_FORMAT).to_string(),
        };
        let query = serde_qs::to_string(&query).map_err(Error::InvalidQuery)?;
        http::Request::get(format!("{BASE_URL}?{query}"))
            .header(header::ACCEPT, "application/json")
            .body(())
            .map_err(Error::InvalidRequest)
    }

    /// Execute the request and sniff the body for the error marker before deserializing it.
    async fn execute(&self, request: http::Request<()>) -> Result<DayValuesResponse, Error> {
        let response = self.transport.execute(request).await?;
        let status = response.status();
        debug!(%status, "received the response");
        let mut body = PeekableBody::new(response.into_body());

        let head = body.peek(ERROR_MARKER.len()).await?;
        let (is_error, is_truncated) = (head == ERROR_MARKER, head.len() < ERROR_MARKER.len());
        if is_error {
            let body = String::from_utf8_lossy(&body.read_to_end().await?).into_owned();
            warn!(%status, %body, "the API responded with an error");
            return Err(Error::ErrorMarker { status, body });
        }
        if status != StatusCode::OK {
            return Err(Error::UnexpectedStatus(status));
        }
        if is_truncated {
            return Err(Error::TruncatedBody);
        }

        DayValuesResponse::from_slice(&body.read_to_end().await?)
    }
}
