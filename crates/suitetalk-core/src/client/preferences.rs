//! General request preferences.

use serde::{Deserialize, Serialize};

/// Preferences that change how the remote applies writes.
///
/// Unset fields are left out of the header and take the account default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_as_error: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_mandatory_custom_field_validation: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_system_notes_for_custom_fields: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_read_only_fields: Option<bool>,
}

impl Preferences {
    pub fn warning_as_error(mut self, value: bool) -> Self {
        self.warning_as_error = Some(value);
        self
    }

    pub fn disable_mandatory_custom_field_validation(mut self, value: bool) -> Self {
        self.disable_mandatory_custom_field_validation = Some(value);
        self
    }

    pub fn disable_system_notes_for_custom_fields(mut self, value: bool) -> Self {
        self.disable_system_notes_for_custom_fields = Some(value);
        self
    }

    pub fn ignore_read_only_fields(mut self, value: bool) -> Self {
        self.ignore_read_only_fields = Some(value);
        self
    }
}
