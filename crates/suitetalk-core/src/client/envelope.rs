//! The unit of work handed to a transport.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Header carrying a password passport.
pub const PASSPORT: &str = "passport";

/// Header carrying a token passport.
pub const TOKEN_PASSPORT: &str = "tokenPassport";

/// Header carrying the application id for password logins.
pub const APPLICATION_INFO: &str = "applicationInfo";

/// Header carrying general write preferences.
pub const PREFERENCES: &str = "preferences";

/// Header carrying search paging preferences.
pub const SEARCH_PREFERENCES: &str = "searchPreferences";

/// Headers only the client itself may set.
pub(crate) const AUTH_HEADERS: [&str; 3] = [PASSPORT, TOKEN_PASSPORT, APPLICATION_INFO];

/// One remote operation with its headers and body.
///
/// Serializes as `{"operation": .., "header": {..}, "body": ..}`.
#[derive(Clone, PartialEq, Serialize)]
pub struct Envelope {
    operation: String,
    header: BTreeMap<String, Value>,
    body: Value,
}

impl Envelope {
    pub(crate) fn new(operation: &str, header: BTreeMap<String, Value>, body: Value) -> Self {
        Self {
            operation: operation.to_string(),
            header,
            body,
        }
    }

    /// Returns the operation name, e.g. `searchMoreWithId`.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&Value> {
        self.header.get(name)
    }

    /// Returns all header names in sorted order.
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.header.keys().map(String::as_str)
    }

    /// Returns the operation body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The envelope as a JSON value, as written to the call log.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "operation": self.operation,
            "header": self.header,
            "body": self.body,
        })
    }
}

// Header values carry credentials; only their names are shown.
impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("operation", &self.operation)
            .field("header", &self.header.keys().collect::<Vec<_>>())
            .field("body", &self.body)
            .finish()
    }
}
