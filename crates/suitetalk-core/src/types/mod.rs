//! Core value types.
//!
//! These types enforce their invariants at construction and deserialization
//! time, so a malformed record or URL never reaches the client.

mod record;
mod service_url;

pub use record::{Record, RecordRef};
pub use service_url::{LEGACY_HOST, ServiceUrl};

pub(crate) use service_url::port_location;
