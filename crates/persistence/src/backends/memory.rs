//! In-process document store.
//!
//! [`InMemoryStore`] implements [`DocumentStoreApi`] without any network. It
//! keeps documents per `(index, doc_type)` in insertion order, assigns UUID
//! identifiers, and records every request it receives so tests can assert on
//! the exact envelopes a driver issued.
//!
//! Supported query bodies: no `query`, `match_all`, and single-field `term` or
//! `match` (exact equality). `from`/`size` are honoured and `total` counts all
//! matches. Anything else is rejected with [`StoreError::InvalidRequest`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::core::{
    CreateIndexRequest, DeleteRequest, DocumentStoreApi, GetRequest, IndexRequest,
    SearchRequest, SearchResponse, StoredDocument, UpdateRequest,
};
use crate::error::{StoreError, StoreResult};
use crate::types::Record;

/// A request received by [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum RecordedRequest {
    CreateIndex(CreateIndexRequest),
    Get(GetRequest),
    Index(IndexRequest),
    Update(UpdateRequest),
    Delete(DeleteRequest),
    Search(SearchRequest),
}

type BucketKey = (String, String);

#[derive(Debug, Default)]
struct MemoryState {
    indices: HashSet<BucketKey>,
    documents: HashMap<BucketKey, Vec<StoredDocument>>,
    requests: Vec<RecordedRequest>,
    fail_writes: Option<StoreError>,
}

/// In-memory [`DocumentStoreApi`] implementation.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document directly, bypassing request recording.
    pub fn seed(&self, index: &str, doc_type: &str, id: &str, source: Record) {
        let mut state = self.state.lock();
        upsert(
            state
                .documents
                .entry((index.to_string(), doc_type.to_string()))
                .or_default(),
            id.to_string(),
            source,
        );
    }

    /// Returns a stored document's body.
    pub fn document(&self, index: &str, doc_type: &str, id: &str) -> Option<Record> {
        let state = self.state.lock();
        state
            .documents
            .get(&(index.to_string(), doc_type.to_string()))?
            .iter()
            .find(|doc| doc.id == id)
            .map(|doc| doc.source.clone())
    }

    /// Returns the number of documents stored in a bucket.
    pub fn len(&self, index: &str, doc_type: &str) -> usize {
        let state = self.state.lock();
        state
            .documents
            .get(&(index.to_string(), doc_type.to_string()))
            .map_or(0, Vec::len)
    }

    /// Returns true if no bucket holds any document.
    pub fn is_empty(&self) -> bool {
        self.state.lock().documents.values().all(Vec::is_empty)
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().requests.last().cloned()
    }

    /// Makes every subsequent write (index, update, delete) fail with `error`.
    /// Pass `None` to restore normal behaviour.
    pub fn fail_writes(&self, error: Option<StoreError>) {
        self.state.lock().fail_writes = error;
    }
}

fn upsert(documents: &mut Vec<StoredDocument>, id: String, source: Record) {
    match documents.iter_mut().find(|doc| doc.id == id) {
        Some(existing) => existing.source = source,
        None => documents.push(StoredDocument { id, source }),
    }
}

fn check_writes(state: &MemoryState) -> StoreResult<()> {
    match &state.fail_writes {
        Some(error) => Err(error.clone()),
        None => Ok(()),
    }
}

/// Evaluates the supported subset of the query DSL against one document.
fn matches(query: Option<&Value>, document: &StoredDocument) -> StoreResult<bool> {
    let Some(query) = query else {
        return Ok(true);
    };
    let Some((kind, clause)) = query.as_object().and_then(|q| q.iter().next()) else {
        return Err(unsupported(query));
    };

    match kind.as_str() {
        "match_all" => Ok(true),
        "term" | "match" => {
            let Some((field, expected)) = clause.as_object().and_then(|c| c.iter().next()) else {
                return Err(unsupported(query));
            };
            let expected = expected.get("value").unwrap_or(expected);
            let actual = if field == "_id" {
                Some(Value::String(document.id.clone()))
            } else {
                document.source.get(field).cloned()
            };
            Ok(actual.as_ref() == Some(expected))
        }
        _ => Err(unsupported(query)),
    }
}

fn unsupported(query: &Value) -> StoreError {
    StoreError::InvalidRequest {
        message: format!("unsupported query: {}", query),
    }
}

fn usize_param(body: &Record, key: &str, default: usize) -> StoreResult<usize> {
    match body.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_u64()
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
            .ok_or_else(|| StoreError::InvalidRequest {
                message: format!("`{}` must be a non-negative integer", key),
            }),
    }
}

#[async_trait]
impl DocumentStoreApi for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create_index(&self, request: CreateIndexRequest) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::CreateIndex(request.clone()));

        let key = (request.index, request.doc_type);
        if !state.indices.insert(key.clone()) {
            return Err(StoreError::Status {
                status: 400,
                body: format!("resource_already_exists_exception: {}_{}", key.0, key.1),
            });
        }
        Ok(())
    }

    async fn get(&self, request: GetRequest) -> StoreResult<Option<StoredDocument>> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::Get(request.clone()));

        Ok(state
            .documents
            .get(&(request.index, request.doc_type))
            .and_then(|docs| docs.iter().find(|doc| doc.id == request.id))
            .cloned())
    }

    async fn index(&self, request: IndexRequest) -> StoreResult<String> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::Index(request.clone()));
        check_writes(&state)?;

        let id = request
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        upsert(
            state
                .documents
                .entry((request.index, request.doc_type))
                .or_default(),
            id.clone(),
            request.body,
        );
        Ok(id)
    }

    async fn update(&self, request: UpdateRequest) -> StoreResult<()> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::Update(request.clone()));
        check_writes(&state)?;

        let existing = state
            .documents
            .get_mut(&(request.index, request.doc_type))
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == request.id));

        match existing {
            Some(existing) => {
                for (field, value) in request.doc {
                    existing.source.insert(field, value);
                }
                Ok(())
            }
            None => Err(StoreError::Status {
                status: 404,
                body: format!("document_missing_exception: [{}]", request.id),
            }),
        }
    }

    async fn delete(&self, request: DeleteRequest) -> StoreResult<bool> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::Delete(request.clone()));
        check_writes(&state)?;

        let Some(docs) = state.documents.get_mut(&(request.index, request.doc_type)) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| doc.id != request.id);
        Ok(docs.len() < before)
    }

    async fn search(&self, request: SearchRequest) -> StoreResult<SearchResponse> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest::Search(request.clone()));

        let from = usize_param(&request.body, "from", 0)?;
        let size = usize_param(&request.body, "size", 10)?;
        let query = request.body.get("query");

        let mut matched = Vec::new();
        if let Some(docs) = state.documents.get(&(request.index, request.doc_type)) {
            for doc in docs {
                if matches(query, doc)? {
                    matched.push(doc.clone());
                }
            }
        }

        let total = matched.len() as u64;
        let hits = matched.into_iter().skip(from).take(size).collect();
        Ok(SearchResponse { hits, total })
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
