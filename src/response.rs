//! Raw `getDayValues` response and its reshaping into per-device readings.

use std::collections::HashMap;

use serde::Deserialize;
use serde_with::serde_as;
use tracing::{debug, instrument};

use crate::{
    error::Error,
    models::{DayValues, Device, Value},
};

/// The body shape depends on the active epoch, hence it stays untyped until [`decode`].
#[serde_as]
#[derive(Deserialize)]
pub struct DayValuesResponse {
    header: Header,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(rename = "body", default)]
    readings: serde_json::Map<String, serde_json::Value>,
}

#[serde_as]
#[derive(Deserialize)]
struct Header {
    epoch: String,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    timezone: String,

    /// Sic, the API calls it `utf_offset`.
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(rename = "utf_offset", default)]
    utc_offset: String,

    #[serde(rename = "epoch_devices")]
    epoch_devices: HashMap<String, HashMap<String, Device>>,
}

impl DayValuesResponse {
    /// # Errors
    ///
    /// [`Error::Json`] when the body is not a valid response.
    pub fn from_slice(body: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(body).map_err(Error::Json)
    }
}

/// Reshape the `date → device → channel → value` body into readings per device.
///
/// Every device of the active epoch gets an entry, even without readings.
///
/// # Errors
///
/// Decoding errors when the epoch is unknown, or the body does not have the expected nesting,
/// or the body mentions a device outside the epoch's directory.
#[instrument(skip_all, fields(epoch = %response.header.epoch))]
pub fn decode(response: DayValuesResponse) -> Result<HashMap<String, DayValues>, Error> {
    let DayValuesResponse { header, readings } = response;
    debug!(timezone = %header.timezone, utc_offset = %header.utc_offset, "decoding…");

    let Header { epoch, mut epoch_devices, .. } = header;
    let devices = epoch_devices.remove(&epoch).ok_or(Error::UnknownEpoch(epoch))?;
    let mut day_values: HashMap<String, DayValues> = devices
        .into_iter()
        .map(|(device_id, device)| (device_id, DayValues::new(device)))
        .collect();

    for (date, device_map) in readings {
        let serde_json::Value::Object(device_map) = device_map else {
            return Err(Error::InvalidDeviceMap { date });
        };
        for (device_id, value_map) in device_map {
            let serde_json::Value::Object(value_map) = value_map else {
                return Err(Error::InvalidValueMap { date, device_id });
            };
            let Some(entry) = day_values.get_mut(&device_id) else {
                return Err(Error::UnknownDevice { date, device_id });
            };
            for (channel_id, value) in value_map {
                let serde_json::Value::String(value) = value else {
                    return Err(Error::InvalidValue { date, device_id, channel_id });
                };
                if let Some(replaced) =
                    entry.values.insert(date.clone(), Value::new(channel_id, value))
                {
                    debug!(%date, %device_id, channel_id = replaced.channel(), "replaced");
                }
            }
        }
    }

    Ok(day_values)
}
