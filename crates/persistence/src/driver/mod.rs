//! The ORM storage driver.
//!
//! [`DocumentStoreDriver`] translates [`ModelStorage`] calls into document-store
//! request envelopes and reshapes the responses into ORM records. It holds only
//! a client handle and the index name, both fixed at construction, so one
//! driver can serve concurrent callers behind an `Arc`.
//!
//! Every write is issued with [`WriteOptions::DURABLE`]: refreshed, so reads
//! through this driver observe it immediately, and acknowledged by a quorum of
//! shard copies.

mod request;
mod response;

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{
    DeleteRequest, DocumentStoreApi, GetRequest, IndexRequest, ModelStorage, SearchRequest,
    SearchResponse, UpdateRequest, WriteOptions,
};
use crate::error::{DriverError, DriverResult};
use crate::types::{Document, Identifier, Model, Page, Record};

/// Storage driver mapping ORM persistence calls onto a document store.
pub struct DocumentStoreDriver<C> {
    client: C,
    index: String,
    find_size_ceiling: u64,
}

impl<C: DocumentStoreApi> Debug for DocumentStoreDriver<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStoreDriver")
            .field("backend", &self.client.backend_name())
            .field("index", &self.index)
            .field("find_size_ceiling", &self.find_size_ceiling)
            .finish_non_exhaustive()
    }
}

impl<C: DocumentStoreApi> DocumentStoreDriver<C> {
    /// Default `size` sent by `find`.
    pub const DEFAULT_FIND_SIZE_CEILING: u64 = 10_000;

    /// Creates a driver over `client` targeting `index`.
    pub fn new(client: C, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
            find_size_ceiling: Self::DEFAULT_FIND_SIZE_CEILING,
        }
    }

    /// Sets the `size` used by `find` and `count`.
    pub fn with_find_size_ceiling(mut self, ceiling: u64) -> Self {
        self.find_size_ceiling = ceiling;
        self
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the configured index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Returns the `size` used by `find` and `count`.
    pub fn find_size_ceiling(&self) -> u64 {
        self.find_size_ceiling
    }

    /// Checks that the document store is reachable.
    pub async fn health_check(&self) -> DriverResult<()> {
        self.client.health_check().await?;
        Ok(())
    }

    async fn search(&self, model: &Model, body: Record) -> DriverResult<SearchResponse> {
        tracing::debug!(
            index = %self.index,
            bucket = %model.bucket,
            size = ?body.get("size"),
            from = ?body.get("from"),
            "Searching"
        );
        let response = self
            .client
            .search(SearchRequest {
                index: self.index.clone(),
                doc_type: model.bucket.clone(),
                body,
            })
            .await?;
        Ok(response)
    }
}

#[cfg(feature = "elasticsearch")]
impl DocumentStoreDriver<crate::backends::elasticsearch::ElasticsearchClient> {
    /// Creates a driver backed by Elasticsearch from configuration.
    ///
    /// # Errors
    ///
    /// * `DriverError::InvalidArgument` - If the configuration does not validate
    /// * `DriverError::Store` - If the client cannot be built
    pub fn from_config(config: &crate::config::DriverConfig) -> DriverResult<Self> {
        config
            .validate()
            .map_err(|errors| DriverError::invalid_argument(errors.join("; ")))?;
        let client = crate::backends::elasticsearch::ElasticsearchClient::new(config)?;
        Ok(Self::new(client, config.index.clone()).with_find_size_ceiling(config.find_size_ceiling))
    }
}

#[async_trait]
impl<C: DocumentStoreApi> ModelStorage for DocumentStoreDriver<C> {
    async fn create_indices(&self, model: &Model, data: Value) -> DriverResult<()> {
        let request = request::index_creation(&self.index, model, data)?;
        tracing::info!(
            index = %request.index,
            bucket = %request.doc_type,
            "Creating index"
        );
        self.client.create_index(request).await?;
        Ok(())
    }

    async fn create(&self, _model: &Model) -> DriverResult<()> {
        Ok(())
    }

    async fn get(&self, model: &Model, key: &str) -> DriverResult<Record> {
        if key.is_empty() {
            return Err(DriverError::invalid_argument("identifier must not be empty"));
        }
        tracing::debug!(index = %self.index, bucket = %model.bucket, id = key, "Fetching document");
        let found = self
            .client
            .get(GetRequest {
                index: self.index.clone(),
                doc_type: model.bucket.clone(),
                id: key.to_string(),
            })
            .await?;

        match found {
            Some(document) => Ok(response::into_record(model, document)),
            None => Err(DriverError::NotFound {
                bucket: model.bucket.clone(),
                id: key.to_string(),
            }),
        }
    }

    async fn post(&self, document: &Document, data: Record) -> DriverResult<Document> {
        let model = document.model();
        tracing::debug!(
            index = %self.index,
            bucket = %model.bucket,
            id = ?document.primary_key(),
            "Indexing document"
        );
        let id = self
            .client
            .index(IndexRequest {
                index: self.index.clone(),
                doc_type: model.bucket.clone(),
                id: document.primary_key().map(str::to_string),
                body: data,
                write: WriteOptions::DURABLE,
            })
            .await?;

        Ok(document.clone().with_primary_key(id))
    }

    async fn put(
        &self,
        document: &Document,
        set: Record,
        unset: &[String],
    ) -> DriverResult<Document> {
        let model = document.model();
        let missing_key = || DriverError::MissingPrimaryKey {
            bucket: model.bucket.clone(),
        };
        let field = model.primary_key_field().ok_or_else(missing_key)?;
        let current = document.primary_key().ok_or_else(missing_key)?;

        if !document.is_persisted() {
            tracing::debug!(
                bucket = %model.bucket,
                id = current,
                "Document never persisted; writing full body"
            );
            return self.post(document, set).await;
        }

        let doc = request::diff(set, unset);
        let target = request::update_target(document, field, current, &doc)?;

        tracing::debug!(
            index = %self.index,
            bucket = %model.bucket,
            id = %target,
            fields = doc.len(),
            "Updating document"
        );
        self.client
            .update(UpdateRequest {
                index: self.index.clone(),
                doc_type: model.bucket.clone(),
                id: target,
                doc,
                write: WriteOptions::DURABLE,
            })
            .await?;

        Ok(document.clone())
    }

    async fn del(&self, model: &Model, key: &Identifier) -> DriverResult<()> {
        let id = key.resolve()?;
        tracing::debug!(index = %self.index, bucket = %model.bucket, id = %id, "Deleting document");

        let existed = self
            .client
            .delete(DeleteRequest {
                index: self.index.clone(),
                doc_type: model.bucket.clone(),
                id: id.clone(),
                refresh: true,
            })
            .await?;

        if existed {
            Ok(())
        } else {
            Err(DriverError::NotFound {
                bucket: model.bucket.clone(),
                id,
            })
        }
    }

    async fn find_one(&self, model: &Model, spec: &Record) -> DriverResult<Option<Record>> {
        let response = self.search(model, request::sized_query(spec, 1)).await?;
        Ok(response
            .hits
            .into_iter()
            .next()
            .map(|hit| response::into_record(model, hit)))
    }

    async fn find(&self, model: &Model, spec: &Record) -> DriverResult<Vec<Record>> {
        let body = request::sized_query(spec, self.find_size_ceiling);
        let response = self.search(model, body).await?;
        Ok(response::into_records(model, response))
    }

    async fn count(&self, model: &Model, spec: &Record) -> DriverResult<u64> {
        let records = self.find(model, spec).await?;
        Ok(records.len() as u64)
    }

    async fn find_limit(
        &self,
        model: &Model,
        spec: &Record,
        start: u64,
        limit: u64,
    ) -> DriverResult<Page> {
        let response = self
            .search(model, request::paged_query(spec, start, limit))
            .await?;
        Ok(response::into_page(model, response, start, limit))
    }
}
