//! Document-store client abstraction.
//!
//! [`DocumentStoreApi`] is the boundary between the driver and a concrete
//! search-engine client. Each method is one request/response round trip and
//! receives a fully built request envelope; implementations translate the
//! envelope to their wire protocol and nothing more.

// Envelope fields mirror the wire parameter names
#![allow(missing_docs)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::types::Record;

/// Replica acknowledgement required before a write succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteConsistency {
    /// The primary shard alone.
    One,
    /// A majority of shard copies.
    Quorum,
    /// Every shard copy.
    All,
}

/// Durability options attached to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Make the write visible to searches before the call returns.
    pub refresh: bool,
    /// Replica acknowledgement policy.
    pub consistency: WriteConsistency,
}

impl WriteOptions {
    /// The policy used for every driver write: refreshed and quorum-acknowledged.
    pub const DURABLE: WriteOptions = WriteOptions {
        refresh: true,
        consistency: WriteConsistency::Quorum,
    };
}

/// Request to create an index for a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexRequest {
    pub index: String,
    pub doc_type: String,
    /// Index settings and mappings, passed through untouched.
    pub body: Record,
    /// Remaining caller-supplied request parameters.
    pub params: Record,
}

/// Request to fetch one document by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    pub index: String,
    pub doc_type: String,
    pub id: String,
}

/// Request to write a full document body.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRequest {
    pub index: String,
    pub doc_type: String,
    /// Target identifier; `None` lets the store assign one.
    pub id: Option<String>,
    pub body: Record,
    pub write: WriteOptions,
}

/// Request to merge a partial document into an existing one.
///
/// Fields mapped to `null` in `doc` are cleared by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub index: String,
    pub doc_type: String,
    pub id: String,
    pub doc: Record,
    pub write: WriteOptions,
}

/// Request to delete one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub index: String,
    pub doc_type: String,
    pub id: String,
    pub refresh: bool,
}

/// Search request; `body` is the caller's query with `size`/`from` applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index: String,
    pub doc_type: String,
    pub body: Record,
}

/// A stored document: its store identifier and `_source` body.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub source: Record,
}

/// Search response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResponse {
    /// Hits in store rank order.
    pub hits: Vec<StoredDocument>,
    /// Total number of matching documents, independent of `size`/`from`.
    pub total: u64,
}

/// Operations a document-store client must provide.
///
/// Methods must not retry; failures are reported as [`StoreError`](crate::error::StoreError)
/// and surfaced to the caller verbatim.
#[async_trait]
pub trait DocumentStoreApi: Send + Sync {
    /// Returns a human-readable name for this client.
    fn backend_name(&self) -> &'static str;

    /// Creates the index for a bucket.
    async fn create_index(&self, request: CreateIndexRequest) -> StoreResult<()>;

    /// Fetches one document, or `None` if it does not exist.
    async fn get(&self, request: GetRequest) -> StoreResult<Option<StoredDocument>>;

    /// Writes a full document and returns the identifier it was stored under.
    async fn index(&self, request: IndexRequest) -> StoreResult<String>;

    /// Applies a partial update.
    async fn update(&self, request: UpdateRequest) -> StoreResult<()>;

    /// Deletes a document. Returns `false` if it did not exist.
    async fn delete(&self, request: DeleteRequest) -> StoreResult<bool>;

    /// Runs a search.
    async fn search(&self, request: SearchRequest) -> StoreResult<SearchResponse>;

    /// Verifies the store is reachable and able to serve requests.
    async fn health_check(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durable_write_options() {
        assert!(WriteOptions::DURABLE.refresh);
        assert_eq!(WriteOptions::DURABLE.consistency, WriteConsistency::Quorum);
    }

    #[test]
    fn test_consistency_serializes_lowercase() {
        let json = serde_json::to_value(WriteOptions::DURABLE).unwrap();
        assert_eq!(json["consistency"], "quorum");
        assert_eq!(json["refresh"], true);
    }
}
