//! ORM-facing storage trait.
//!
//! This module defines the [`ModelStorage`] trait, the set of persistence calls
//! an Osmos model issues against its driver.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DriverResult;
use crate::types::{Document, Identifier, Model, Page, Record};

/// Persistence operations the ORM drives.
///
/// Every operation performs at most one store round trip. Write operations
/// return an updated copy of the [`Document`] rather than mutating it.
///
/// # Example
///
/// ```ignore
/// use osmos_elastic::core::ModelStorage;
/// use osmos_elastic::types::{Document, Model};
///
/// async fn example<S: ModelStorage>(storage: &S) -> osmos_elastic::error::DriverResult<()> {
///     let users = Model::new("users").with_primary_key("id");
///
///     let mut body = serde_json::Map::new();
///     body.insert("name".into(), "Ada".into());
///     let doc = storage.post(&Document::new(users.clone()), body).await?;
///
///     let id = doc.primary_key().unwrap();
///     let record = storage.get(&users, id).await?;
///     assert_eq!(record["id"], id);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ModelStorage: Send + Sync {
    /// Creates the index for a model's bucket.
    ///
    /// `data` must be a JSON object. `type` defaults to the model's bucket and
    /// `body` to an empty object; `index` is always the configured index.
    ///
    /// # Errors
    ///
    /// * `DriverError::InvalidArgument` - If `data` is not an object
    async fn create_indices(&self, model: &Model, data: Value) -> DriverResult<()>;

    /// Allocates an empty record. Documents are created on first `post`, so
    /// this always succeeds without touching the store.
    async fn create(&self, model: &Model) -> DriverResult<()>;

    /// Fetches one record by store identifier.
    ///
    /// # Errors
    ///
    /// * `DriverError::InvalidArgument` - If `key` is empty
    /// * `DriverError::NotFound` - If no document has that identifier
    async fn get(&self, model: &Model, key: &str) -> DriverResult<Record>;

    /// Writes `data` as the full body of `document`.
    ///
    /// Writes to the document's primary key when it has one; otherwise the
    /// store assigns an identifier. Returns the document with its primary key
    /// set to the identifier the store confirmed.
    async fn post(&self, document: &Document, data: Record) -> DriverResult<Document>;

    /// Applies a partial update: fields in `set` take new values and fields in
    /// `unset` are cleared.
    ///
    /// A document that was never persisted is written with [`post`](Self::post)
    /// using `set` as its body.
    ///
    /// # Errors
    ///
    /// * `DriverError::MissingPrimaryKey` - If the schema declares no primary
    ///   key or the document has none
    async fn put(&self, document: &Document, set: Record, unset: &[String])
    -> DriverResult<Document>;

    /// Deletes one record.
    ///
    /// # Errors
    ///
    /// * `DriverError::InvalidArgument` - If a keyed identifier does not hold exactly one entry
    /// * `DriverError::NotFound` - If no document has that identifier
    async fn del(&self, model: &Model, key: &Identifier) -> DriverResult<()>;

    /// Returns the best-ranked record matching `spec`, if any.
    async fn find_one(&self, model: &Model, spec: &Record) -> DriverResult<Option<Record>>;

    /// Returns every record matching `spec` in store rank order.
    async fn find(&self, model: &Model, spec: &Record) -> DriverResult<Vec<Record>>;

    /// Counts the records `find` returns for `spec`.
    async fn count(&self, model: &Model, spec: &Record) -> DriverResult<u64>;

    /// Returns one page of records matching `spec`.
    async fn find_limit(
        &self,
        model: &Model,
        spec: &Record,
        start: u64,
        limit: u64,
    ) -> DriverResult<Page>;
}
