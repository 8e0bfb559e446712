//! ORM model descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Record;

/// Schema information the driver needs from an ORM model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Name of the field kept in sync with the store identifier.
    #[serde(default)]
    pub primary_key: Option<String>,
}

impl Schema {
    /// Creates a schema whose primary key is `field`.
    pub fn with_primary_key(field: impl Into<String>) -> Self {
        Self {
            primary_key: Some(field.into()),
        }
    }
}

/// A record type as seen by the driver.
///
/// The bucket names the document category inside the configured index; one
/// model maps to exactly one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Document category within the index.
    pub bucket: String,

    /// Schema of the model.
    #[serde(default)]
    pub schema: Schema,
}

impl Model {
    /// Creates a model with no primary key declared.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            schema: Schema::default(),
        }
    }

    /// Sets the schema's primary-key field.
    pub fn with_primary_key(mut self, field: impl Into<String>) -> Self {
        self.schema.primary_key = Some(field.into());
        self
    }

    /// Returns the declared primary-key field, if any.
    pub fn primary_key_field(&self) -> Option<&str> {
        self.schema.primary_key.as_deref()
    }

    /// Writes `id` into `record` under the primary-key field.
    ///
    /// Any value already stored under that field is replaced. Models without a
    /// primary key get the record back untouched.
    pub fn inject_primary_key(&self, id: &str, mut record: Record) -> Record {
        if let Some(field) = self.primary_key_field() {
            record.insert(field.to_string(), Value::String(id.to_string()));
        }
        record
    }
}
