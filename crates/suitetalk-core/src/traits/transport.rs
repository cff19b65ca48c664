//! Transport trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::Envelope;
use crate::error::TransportError;

/// The RPC binding that carries an [`Envelope`] to the remote service.
///
/// Implementations own connection handling, timeouts and wire encoding.
/// They must not retry: a failure is returned to the client as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one operation to `location` and return the decoded response body.
    async fn call(&self, location: &str, envelope: &Envelope) -> Result<Value, TransportError>;
}
