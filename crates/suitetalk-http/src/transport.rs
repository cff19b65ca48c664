//! JSON-over-HTTP binding of the transport trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use suitetalk_core::error::TransportError;
use suitetalk_core::{Envelope, Transport};

/// Connect timeout used unless configured otherwise.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Header naming the operation, as SOAP endpoints expect.
const SOAP_ACTION: &str = "SOAPAction";

/// Longest response excerpt carried in an HTTP error.
const MAX_ERROR_BODY: usize = 512;

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Whole-request timeout. `None` waits for as long as the remote takes.
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: concat!("suitetalk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// A [`Transport`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

/// Fault body returned alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct FaultResponse {
    fault: Fault,
}

#[derive(Debug, Deserialize)]
struct Fault {
    code: String,
    #[serde(default)]
    message: String,
}

impl HttpTransport {
    /// Create a transport with default settings.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a transport with explicit settings.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(0);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(map_reqwest)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, envelope), fields(operation = %envelope.operation()))]
    async fn call(&self, location: &str, envelope: &Envelope) -> Result<Value, TransportError> {
        let url = format!("{}/{}", location.trim_end_matches('/'), envelope.operation());
        debug!(%url, "POST");

        let action = HeaderValue::from_str(envelope.operation()).map_err(|e| {
            TransportError::Connection {
                message: format!("invalid operation name: {}", e),
            }
        })?;

        let response = self
            .client
            .post(&url)
            .header(SOAP_ACTION, action)
            .json(envelope)
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = response.status();
        trace!(status = %status, "response");
        let body = response.bytes().await.map_err(map_reqwest)?;

        if status.is_success() {
            serde_json::from_slice(&body).map_err(|e| TransportError::Decode {
                message: e.to_string(),
            })
        } else {
            Err(parse_error(status.as_u16(), &body))
        }
    }
}

/// Map a non-success response to a fault when the body carries one.
fn parse_error(status: u16, body: &[u8]) -> TransportError {
    if let Ok(FaultResponse { fault }) = serde_json::from_slice::<FaultResponse>(body) {
        return TransportError::Fault {
            code: fault.code,
            message: fault.message,
        };
    }

    let text = String::from_utf8_lossy(body);
    let message: String = text.chars().take(MAX_ERROR_BODY).collect();
    TransportError::Http { status, message }
}

fn map_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else if let Some(status) = err.status() {
        TransportError::Http {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else {
        TransportError::Connection {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_body_becomes_fault() {
        let body = br#"{"fault": {"code": "soapenv:Server.userException", "message": "Invalid login attempt."}}"#;
        assert_eq!(
            parse_error(500, body),
            TransportError::Fault {
                code: "soapenv:Server.userException".to_string(),
                message: "Invalid login attempt.".to_string(),
            }
        );
    }

    #[test]
    fn other_bodies_become_http_errors() {
        assert_eq!(
            parse_error(503, b"Service Unavailable"),
            TransportError::Http {
                status: 503,
                message: "Service Unavailable".to_string(),
            }
        );
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(4096);
        let TransportError::Http { message, .. } = parse_error(502, body.as_bytes()) else {
            panic!("expected HTTP error");
        };
        assert_eq!(message.len(), MAX_ERROR_BODY);
    }

    #[test]
    fn default_config() {
        let config = HttpTransportConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(config.user_agent.starts_with("suitetalk/"));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn transport_builds() {
        assert!(HttpTransport::new().is_ok());
    }
}
