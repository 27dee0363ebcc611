use std::{collections::BTreeMap, str::FromStr};

use serde::Deserialize;
use serde_with::serde_as;

/// Peripheral connected to a Solar-Log that reports readings.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct Device {
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(rename = "serialnumber")]
    pub serial_number: String,

    /// Free-form classification tags, for example `inverter` or `meter`.
    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub classes: Vec<String>,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(rename = "type")]
    pub kind: String,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub model: String,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub name: String,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub id: String,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub uid: String,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub channels: BTreeMap<String, Channel>,
}

impl Device {
    #[must_use]
    pub fn channel(&self, channel_id: &str) -> Option<&Channel> {
        self.channels.get(channel_id)
    }
}

/// Metadata of a single measured quantity on a [`Device`].
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct Channel {
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(rename = "channel")]
    pub index: i64,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub position: i64,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(rename = "basename")]
    pub base_name: String,

    /// Multi-phase and multi-string devices split a base channel into sub-channels.
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(rename = "basechannel")]
    pub base_channel: i64,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(rename = "subchannel")]
    pub sub_channel: i64,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub unit: String,

    #[serde_as(as = "serde_with::DefaultOnNull")]
    pub description: String,
}

/// Single reading: channel identifier and the raw value as the API reports it.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Value {
    channel: String,
    value: String,
}

impl Value {
    pub fn new(channel: impl Into<String>, value: impl Into<String>) -> Self {
        Self { channel: channel.into(), value: value.into() }
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Parse the raw value, the API emits numbers as strings.
    ///
    /// # Errors
    ///
    /// Whatever [`FromStr`] of `T` returns.
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        self.value.parse()
    }
}

/// Device snapshot along with its readings, keyed by date (see [`crate::DATE_FORMAT`]).
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DayValues {
    pub device: Device,
    pub values: BTreeMap<String, Value>,
}

impl DayValues {
    pub const fn new(device: Device) -> Self {
        Self { device, values: BTreeMap::new() }
    }

    /// Look up the channel metadata for a reading.
    #[must_use]
    pub fn channel(&self, channel_id: &str) -> Option<&Channel> {
        self.device.channel(channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_device_ok() -> Result<(), serde_json::Error> {
        // language=json
        let body = r#"{
            "serialnumber": "A1B2C3",
            "classes": ["inverter", "pv"],
            "type": "Inverter",
            "model": "SMA Sunny Boy 5.0",
            "name": "Roof",
            "id": "101",
            "uid": "42:101",
            "channels": {
                "1": {
                    "channel": 1,
                    "position": 0,
                    "basename": "Yield",
                    "basechannel": 1,
                    "subchannel": 0,
                    "unit": "kWh",
                    "description": "Total"
                }
            }
        }"#;
        let device: Device = serde_json::from_str(body)?;
        assert_eq!(device.kind, "Inverter");
        assert_eq!(device.classes, ["inverter", "pv"]);
        let channel = device.channel("1").unwrap();
        assert_eq!(channel.unit, "kWh");
        assert_eq!(channel.base_name, "Yield");
        assert!(device.channel("2").is_none());
        Ok(())
    }

    #[test]
    fn deserialize_sparse_device_ok() -> Result<(), serde_json::Error> {
        // language=json
        let body = r#"{"type": "Meter", "classes": null, "channels": null}"#;
        let device: Device = serde_json::from_str(body)?;
        assert_eq!(device.kind, "Meter");
        assert!(device.classes.is_empty());
        assert!(device.channels.is_empty());
        assert!(device.serial_number.is_empty());
        Ok(())
    }

    #[test]
    fn deserialize_null_channel_fields_ok() -> Result<(), serde_json::Error> {
        // language=json
        let body = r#"{
            "channel": null,
            "position": 3,
            "basename": null,
            "basechannel": null,
            "subchannel": null,
            "unit": null,
            "description": "Total"
        }"#;
        let channel: Channel = serde_json::from_str(body)?;
        assert_eq!(channel.index, 0);
        assert_eq!(channel.position, 3);
        assert!(channel.base_name.is_empty());
        assert!(channel.unit.is_empty());
        assert_eq!(channel.description, "Total");
        Ok(())
    }

    #[test]
    fn parse_value_ok() {
        let value = Value::new("1", "12.5");
        assert_eq!(value.channel(), "1");
        assert_eq!(value.parse::<f64>(), Ok(12.5));
        assert!(Value::new("1", "n/a").parse::<f64>().is_err());
    }

    #[test]
    fn day_values_channel_delegates_to_device() {
        let mut device = Device::default();
        device.channels.insert(
            "2".to_string(),
            Channel { unit: "W".to_string(), ..Channel::default() },
        );
        let day_values = DayValues::new(device);
        assert_eq!(day_values.channel("2").map(|channel| channel.unit.as_str()), Some("W"));
        assert!(day_values.values.is_empty());
    }
}
