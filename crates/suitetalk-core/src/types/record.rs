//! Opaque record payloads and record references.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, InvalidInputError};

/// A business object from the remote schema.
///
/// The client treats records as opaque. The only guarantees are that the
/// value is a JSON object and that it names its schema type in a string
/// `$type` field. Hydration into concrete schema types is left to the
/// generated schema crate through [`Record::to_typed`].
///
/// # Example
///
/// ```
/// use suitetalk_core::Record;
/// use serde_json::json;
///
/// let record = Record::new(json!({
///     "$type": "Customer",
///     "companyName": "Wolfe Electronics"
/// })).unwrap();
///
/// assert_eq!(record.record_type(), "Customer");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Value);

impl Record {
    /// Create a record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object or has no string `$type`.
    pub fn new(value: Value) -> Result<Self, Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// Create a record of the given type from an object of fields.
    pub fn with_type(record_type: &str, value: Value) -> Result<Self, Error> {
        let Value::Object(mut fields) = value else {
            return Err(invalid("record must be a JSON object"));
        };
        fields.insert("$type".to_string(), Value::String(record_type.to_string()));
        Self::new(Value::Object(fields))
    }

    /// Serialize a typed schema value into a record of the given type.
    pub fn from_typed<T: Serialize>(record_type: &str, value: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(value).map_err(|e| invalid(&e.to_string()))?;
        Self::with_type(record_type, value)
    }

    /// Deserialize the record into a typed schema value.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, Error> {
        T::deserialize(&self.0).map_err(|e| invalid(&e.to_string()))
    }

    /// Returns the `$type` discriminator.
    pub fn record_type(&self) -> &str {
        // Present by construction.
        self.0
            .get("$type")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Get a field from the record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a reference to the inner JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume and return the inner JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    fn validate(value: &Value) -> Result<(), Error> {
        let obj = value
            .as_object()
            .ok_or_else(|| invalid("record must be a JSON object"))?;

        match obj.get("$type") {
            Some(Value::String(t)) if !t.is_empty() => Ok(()),
            Some(_) => Err(invalid("$type field must be a non-empty string")),
            None => Err(invalid("record must contain a $type field")),
        }
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidInput(InvalidInputError::Record {
        reason: reason.to_string(),
    })
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Record::new(value).map_err(serde::de::Error::custom)
    }
}

/// A reference to a record by internal or external id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Record type name, e.g. `customer`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RecordRef {
    /// Reference a record by internal id.
    pub fn internal(internal_id: impl Into<String>) -> Self {
        Self {
            internal_id: Some(internal_id.into()),
            ..Self::default()
        }
    }

    /// Reference a record by external id.
    pub fn external(external_id: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id.into()),
            ..Self::default()
        }
    }

    /// Set the record type.
    pub fn with_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }
}
