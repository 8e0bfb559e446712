//! Response reshaping into ORM records.

use crate::core::{SearchResponse, StoredDocument};
use crate::types::{Model, Page, Record};

/// Turns a stored document into a record keyed by the model's primary key.
pub(crate) fn into_record(model: &Model, document: StoredDocument) -> Record {
    model.inject_primary_key(&document.id, document.source)
}

/// Turns every hit of a search into records, keeping store rank order.
pub(crate) fn into_records(model: &Model, response: SearchResponse) -> Vec<Record> {
    response
        .hits
        .into_iter()
        .map(|hit| into_record(model, hit))
        .collect()
}

/// Builds a page from a paginated search.
pub(crate) fn into_page(model: &Model, response: SearchResponse, start: u64, limit: u64) -> Page {
    let count = response.total;
    Page {
        docs: into_records(model, response),
        count,
        start,
        limit,
    }
}
