//! Translation between request envelopes and Elasticsearch wire values.

use serde_json::Value;

use crate::core::{SearchResponse, StoredDocument, WriteConsistency};
use crate::error::{StoreError, StoreResult};
use crate::types::Record;

/// Returns the physical index holding `doc_type` within `index`.
pub(crate) fn physical_index(index: &str, doc_type: &str) -> String {
    format!("{}_{}", index, doc_type).to_lowercase()
}

/// Returns the `wait_for_active_shards` value for a consistency level.
///
/// Quorum is a strict majority of the `number_of_replicas + 1` shard copies
/// once there are more than two copies. With one or two copies the primary
/// alone is a quorum.
pub(crate) fn active_shards(consistency: WriteConsistency, number_of_replicas: u32) -> String {
    match consistency {
        WriteConsistency::One => "1".to_string(),
        WriteConsistency::Quorum => {
            let copies = number_of_replicas.saturating_add(1);
            if copies > 2 {
                (copies / 2 + 1).to_string()
            } else {
                "1".to_string()
            }
        }
        WriteConsistency::All => "all".to_string(),
    }
}

/// Query-string parameters accepted on index creation.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CreateIndexParams {
    pub timeout: Option<String>,
    pub master_timeout: Option<String>,
    pub wait_for_active_shards: Option<String>,
}

impl CreateIndexParams {
    /// Picks the supported parameters out of caller-supplied extras.
    pub(crate) fn from_record(params: &Record) -> Self {
        let mut parsed = Self::default();
        for (key, value) in params {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            };
            match key.as_str() {
                "timeout" => parsed.timeout = Some(rendered),
                "master_timeout" | "masterTimeout" => parsed.master_timeout = Some(rendered),
                "wait_for_active_shards" | "waitForActiveShards" => {
                    parsed.wait_for_active_shards = Some(rendered)
                }
                unknown => {
                    tracing::warn!(parameter = unknown, "Ignoring unsupported index creation parameter");
                }
            }
        }
        parsed
    }
}

/// Extracts the document from a get response; `None` when `found` is false.
pub(crate) fn parse_get(body: Value) -> StoreResult<Option<StoredDocument>> {
    if body.get("found").and_then(Value::as_bool) == Some(false) {
        return Ok(None);
    }
    parse_hit(body).map(Some)
}

/// Extracts the assigned identifier from an index response.
pub(crate) fn parse_index(body: &Value) -> StoreResult<String> {
    body.get("_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .ok_or_else(|| parse_error("index response has no _id"))
}

/// Extracts hits and total from a search response.
///
/// `hits.total` is accepted both as a bare number and as `{ "value": n }`.
/// When absent, the number of returned hits is used.
pub(crate) fn parse_search(body: Value) -> StoreResult<SearchResponse> {
    let Some(Value::Object(mut hits)) = body.get("hits").cloned() else {
        return Err(parse_error("search response has no hits object"));
    };

    let total = hits.get("total").and_then(|total| {
        total
            .as_u64()
            .or_else(|| total.get("value").and_then(Value::as_u64))
    });

    let hits = match hits.remove("hits") {
        Some(Value::Array(hits)) => hits
            .into_iter()
            .map(parse_hit)
            .collect::<StoreResult<Vec<_>>>()?,
        None => Vec::new(),
        Some(_) => return Err(parse_error("hits.hits is not an array")),
    };

    Ok(SearchResponse {
        total: total.unwrap_or(hits.len() as u64),
        hits,
    })
}

fn parse_hit(hit: Value) -> StoreResult<StoredDocument> {
    let Value::Object(mut hit) = hit else {
        return Err(parse_error("hit is not an object"));
    };

    let id = match hit.remove("_id") {
        Some(Value::String(id)) => id,
        _ => return Err(parse_error("hit has no string _id")),
    };

    let source = match hit.remove("_source") {
        Some(Value::Object(source)) => source,
        None | Some(Value::Null) => Record::new(),
        Some(_) => return Err(parse_error(format!("_source of {} is not an object", id))),
    };

    Ok(StoredDocument { id, source })
}

fn parse_error(message: impl Into<String>) -> StoreError {
    StoreError::Parse {
        message: message.into(),
    }
}
