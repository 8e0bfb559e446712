//! Runtime document state and key representations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DriverError, DriverResult};

use super::{Model, Record};

/// A runtime instance of a [`Model`].
///
/// Documents are values: write operations hand back an updated copy instead of
/// mutating the caller's instance, so a failed write leaves the original as it
/// was.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    model: Model,
    primary_key: Option<String>,
    original_data: Record,
}

impl Document {
    /// Creates a document that has never been persisted.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            primary_key: None,
            original_data: Record::new(),
        }
    }

    /// Sets the document's primary key.
    pub fn with_primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = Some(key.into());
        self
    }

    /// Sets the last-persisted snapshot.
    pub fn with_original_data(mut self, original_data: Record) -> Self {
        self.original_data = original_data;
        self
    }

    /// Returns the model this document belongs to.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the primary key, if assigned.
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Returns the last-persisted snapshot.
    pub fn original_data(&self) -> &Record {
        &self.original_data
    }

    /// Returns the primary-key value recorded in the last-persisted snapshot.
    ///
    /// Null and empty-string values count as absent.
    pub fn original_primary_key(&self) -> Option<&Value> {
        let field = self.model.primary_key_field()?;
        self.original_data.get(field).filter(|v| has_value(v))
    }

    /// Whether the snapshot shows this document was ever written to the store.
    pub fn is_persisted(&self) -> bool {
        self.original_primary_key().is_some()
    }
}

/// Whether a JSON value counts as "set" for key bookkeeping.
pub(crate) fn has_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Renders a scalar JSON value as a store identifier.
pub(crate) fn identifier_from_value(value: &Value) -> DriverResult<String> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(DriverError::invalid_argument(format!(
            "identifier must be a non-empty string or a number, got {}",
            other
        ))),
    }
}

/// Key accepted by delete operations.
///
/// ORMs hand over either a bare identifier or a keyed mapping such as
/// `{"id": "42"}`. A keyed mapping must hold exactly one entry, whose value is
/// the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// A bare store identifier.
    Scalar(String),
    /// A single-entry mapping from key field to identifier.
    Keyed(Record),
}

impl Identifier {
    /// Resolves the store identifier this key denotes.
    pub fn resolve(&self) -> DriverResult<String> {
        match self {
            Identifier::Scalar(id) if id.is_empty() => {
                Err(DriverError::invalid_argument("identifier must not be empty"))
            }
            Identifier::Scalar(id) => Ok(id.clone()),
            Identifier::Keyed(map) => {
                let mut values = map.values();
                match (values.next(), values.next()) {
                    (Some(value), None) => identifier_from_value(value),
                    _ => Err(DriverError::invalid_argument(format!(
                        "keyed identifier must hold exactly one entry, got {}",
                        map.len()
                    ))),
                }
            }
        }
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Identifier::Scalar(id.to_string())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Identifier::Scalar(id)
    }
}

impl From<Record> for Identifier {
    fn from(map: Record) -> Self {
        Identifier::Keyed(map)
    }
}
