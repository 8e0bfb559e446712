//! Request envelope construction.
//!
//! Query augmentation copies the caller's object and assigns `size`/`from`
//! directly, so caller values for those keys are always replaced and nested
//! caller content is never merged into.

use serde_json::Value;

use crate::core::CreateIndexRequest;
use crate::error::{DriverError, DriverResult};
use crate::types::{Document, Model, Record, has_value, identifier_from_value};

/// Builds an index-creation request from caller-supplied `data`.
pub(crate) fn index_creation(
    index: &str,
    model: &Model,
    data: Value,
) -> DriverResult<CreateIndexRequest> {
    let Value::Object(mut data) = data else {
        return Err(DriverError::invalid_argument(
            "`data` needs to be a JSON object",
        ));
    };

    let doc_type = match data.remove("type") {
        None => model.bucket.clone(),
        Some(Value::String(doc_type)) => doc_type,
        Some(other) => {
            return Err(DriverError::invalid_argument(format!(
                "`type` must be a string, got {}",
                other
            )));
        }
    };

    let body = match data.remove("body") {
        None => Record::new(),
        Some(Value::Object(body)) => body,
        Some(other) => {
            return Err(DriverError::invalid_argument(format!(
                "`body` must be a JSON object, got {}",
                other
            )));
        }
    };

    if let Some(requested) = data.remove("index") {
        if requested.as_str() != Some(index) {
            tracing::debug!(requested = %requested, configured = index, "Overriding requested index");
        }
    }

    Ok(CreateIndexRequest {
        index: index.to_string(),
        doc_type,
        body,
        params: data,
    })
}

/// Copies `spec` and forces its `size`.
pub(crate) fn sized_query(spec: &Record, size: u64) -> Record {
    let mut body = spec.clone();
    body.insert("size".to_string(), Value::from(size));
    body
}

/// Copies `spec` and forces its `from` and `size`.
pub(crate) fn paged_query(spec: &Record, from: u64, size: u64) -> Record {
    let mut body = sized_query(spec, size);
    body.insert("from".to_string(), Value::from(from));
    body
}

/// Builds the partial document for an update: `set` values plus an explicit
/// `null` for every field in `unset`.
pub(crate) fn diff(set: Record, unset: &[String]) -> Record {
    let mut diff = set;
    for field in unset {
        diff.insert(field.clone(), Value::Null);
    }
    diff
}

/// Picks the identifier an update must target.
///
/// A diff that rewrites the primary-key field still targets the identifier
/// the document was stored under.
pub(crate) fn update_target(
    document: &Document,
    primary_key_field: &str,
    current: &str,
    diff: &Record,
) -> DriverResult<String> {
    let rewrites_key = diff.get(primary_key_field).is_some_and(has_value);
    match (rewrites_key, document.original_primary_key()) {
        (true, Some(original)) => identifier_from_value(original),
        _ => Ok(current.to_string()),
    }
}
