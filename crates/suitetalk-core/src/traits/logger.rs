//! Call logger trait.

use async_trait::async_trait;
use serde_json::Value;

/// Persists request/response pairs for auditing.
///
/// Implementations are responsible for redacting sensitive fields. The
/// client reports a failing logger through `tracing` and carries on.
#[async_trait]
pub trait CallLogger: Send + Sync {
    /// Record one call. `response` is `None` when the transport failed.
    async fn log_call(
        &self,
        operation: &str,
        request: &Value,
        response: Option<&Value>,
    ) -> std::io::Result<()>;
}
