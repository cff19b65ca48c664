//! suitetalk-file - Filesystem call log for the suitetalk client.
//!
//! [`FileCallLogger`] writes each call as a `-request.json` and
//! `-response.json` pair, with credentials and other sensitive fields
//! replaced by [`REDACTED`].

mod logger;
mod redact;

pub use logger::{DEFAULT_DATE_FORMAT, DEFAULT_FILE_FORMAT, FileCallLogger};
pub use redact::{PRIVATE_FIELDS, REDACTED, redact};
