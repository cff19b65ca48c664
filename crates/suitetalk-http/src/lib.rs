//! suitetalk-http - HTTP transport for the suitetalk client.
//!
//! [`HttpTransport`] carries each envelope as a JSON POST to
//! `<location>/<operation>`. Connections are not reused and nothing is
//! retried; every failure is reported as a
//! [`TransportError`](suitetalk_core::error::TransportError).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use suitetalk_core::{Config, SessionClient};
//! use suitetalk_http::HttpTransport;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let client = SessionClient::new(config, Arc::new(HttpTransport::new()?))?;
//! println!("{}", client.resolve_endpoint().await?);
//! # Ok(())
//! # }
//! ```

mod transport;

pub use transport::{DEFAULT_CONNECT_TIMEOUT, HttpTransport, HttpTransportConfig};
