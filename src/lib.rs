//! [Solar-Log WEB](https://www.solar-log.com) day values client.
//!
//! The API answers `getDayValues` with a header describing the devices of the active epoch
//! and a loosely typed `date → device → channel → value` body,
//! which the [`Client`] reshapes into [`DayValues`] per device.

mod client;
mod error;
mod models;
mod response;
mod transport;

pub use self::{
    client::{BASE_URL, Client, DATE_FORMAT, Options},
    error::{Error, ErrorKind, TransportError},
    models::{Channel, DayValues, Device, Value},
    transport::{Body, Transport},
};
