//! Remote call status and the typed failure raised from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The status block returned with every remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Whether the remote operation succeeded.
    pub is_success: bool,

    /// Diagnostics in the order the remote reported them.
    #[serde(default)]
    pub status_detail: Vec<StatusDetail>,
}

impl Status {
    /// A successful status with no details.
    pub fn success() -> Self {
        Self {
            is_success: true,
            status_detail: Vec::new(),
        }
    }

    /// A failed status carrying the given details.
    pub fn failure(status_detail: Vec<StatusDetail>) -> Self {
        Self {
            is_success: false,
            status_detail,
        }
    }

    /// Convert into a result, turning `isSuccess = false` into a [`StatusFailure`].
    pub fn into_result(self) -> Result<Status, StatusFailure> {
        if self.is_success {
            Ok(self)
        } else {
            Err(StatusFailure::new(self))
        }
    }
}

/// A single `{code, message}` diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetail {
    /// Remote status code, e.g. `INVALID_SEARCH`.
    pub code: String,

    /// Human readable message.
    #[serde(default)]
    pub message: String,

    /// Severity, when the remote supplies one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<StatusDetailType>,
}

impl StatusDetail {
    /// Create an error detail.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            detail_type: None,
        }
    }
}

/// Severity of a status detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusDetailType {
    Error,
    Warn,
    Info,
}

/// The remote reported `isSuccess = false`.
///
/// Carries the full status so callers can implement their own retry policy
/// for codes they know to be transient:
///
/// ```
/// use suitetalk_core::{Status, StatusDetail, StatusFailure};
///
/// let failure = StatusFailure::new(Status::failure(vec![
///     StatusDetail::new("WS_CONCUR_SESSION_DISALLWD", "Only one request may be made at a time"),
/// ]));
/// assert!(failure.contains_code("WS_CONCUR_SESSION_DISALLWD").is_some());
/// assert!(failure.contains_code("INVALID_SEARCH").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFailure {
    status: Status,
    context: Option<String>,
}

impl StatusFailure {
    /// Wrap a failed status.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            context: None,
        }
    }

    /// Attach a descriptive message that precedes the status detail.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns the wrapped status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Consume and return the wrapped status.
    pub fn into_status(self) -> Status {
        self.status
    }

    /// Returns the first status detail whose code equals `code`.
    pub fn contains_code(&self, code: &str) -> Option<&StatusDetail> {
        self.status
            .status_detail
            .iter()
            .find(|detail| detail.code == code)
    }
}

impl fmt::Display for StatusFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref context) = self.context {
            writeln!(f, "{}", context)?;
        }
        let detail = serde_json::to_string(&self.status.status_detail)
            .unwrap_or_else(|_| format!("{:?}", self.status.status_detail));
        write!(f, "remote call failed with status detail: {}", detail)
    }
}

impl std::error::Error for StatusFailure {}
