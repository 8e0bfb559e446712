//! Core traits and request envelopes.
//!
//! - [`ModelStorage`] - the persistence calls an ORM model issues
//! - [`DocumentStoreApi`] - the round trips a document-store client provides
//!
//! ```text
//! ORM ──ModelStorage──▶ DocumentStoreDriver ──DocumentStoreApi──▶ ElasticsearchClient
//!                                                               └▶ InMemoryStore
//! ```

mod client;
mod storage;

pub use client::{
    CreateIndexRequest, DeleteRequest, DocumentStoreApi, GetRequest, IndexRequest,
    SearchRequest, SearchResponse, StoredDocument, UpdateRequest, WriteConsistency,
    WriteOptions,
};
pub use storage::ModelStorage;
