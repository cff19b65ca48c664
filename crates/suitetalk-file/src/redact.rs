//! Field redaction for logged payloads.

use serde_json::Value;

/// Placeholder written over sensitive values.
pub const REDACTED: &str = "[Content Removed for Security Reasons]";

/// Field names whose values are always redacted, wherever they appear.
pub const PRIVATE_FIELDS: [&str; 8] = [
    "password",
    "password2",
    "currentPassword",
    "newPassword",
    "newPassword2",
    "ccNumber",
    "ccSecurityCode",
    "socialSecurityNumber",
];

/// Type of custom field whose value is free text and therefore redacted.
const STRING_CUSTOM_FIELD: &str = "StringCustomFieldRef";

/// Replace sensitive values in place.
///
/// Covers every field named in [`PRIVATE_FIELDS`] at any depth, and the
/// `value` of every `StringCustomFieldRef`.
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            let is_string_custom_field = fields
                .get("$type")
                .and_then(Value::as_str)
                .is_some_and(|t| t == STRING_CUSTOM_FIELD);

            for (key, field) in fields.iter_mut() {
                if PRIVATE_FIELDS.contains(&key.as_str())
                    || (is_string_custom_field && key == "value")
                {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    redact(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}
