//! Osmos Elasticsearch Storage Driver
//!
//! This crate maps the Osmos ORM's persistence calls onto a document-search
//! engine. It owns the contract between ORM-level operations and store
//! operations: how primary keys follow store identifiers, how partial updates
//! and pagination are expressed, and which durability every write requests.
//! Query bodies are forwarded untouched; the driver only sets `size` and
//! `from`.
//!
//! # Features
//!
//! - `elasticsearch` (default) - [`backends::elasticsearch::ElasticsearchClient`]
//!
//! # Architecture
//!
//! - [`types`] - Models, documents, identifiers, and pages exchanged with the ORM
//! - [`core`] - The [`ModelStorage`](core::ModelStorage) and
//!   [`DocumentStoreApi`](core::DocumentStoreApi) traits and request envelopes
//! - [`driver`] - [`DocumentStoreDriver`], the translation layer
//! - [`backends`] - Elasticsearch and in-memory clients
//! - [`config`] - [`DriverConfig`] with serde and environment loading
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use osmos_elastic::backends::memory::InMemoryStore;
//! use osmos_elastic::core::ModelStorage;
//! use osmos_elastic::types::{Document, Identifier, Model};
//! use osmos_elastic::DocumentStoreDriver;
//! use serde_json::json;
//!
//! # tokio_test_block_on(async {
//! let driver = DocumentStoreDriver::new(InMemoryStore::new(), "osmos");
//! let users = Model::new("users").with_primary_key("id");
//!
//! let body = json!({"name": "Ada"}).as_object().cloned().unwrap();
//! let doc = driver.post(&Document::new(users.clone()), body).await.unwrap();
//! let id = doc.primary_key().unwrap().to_string();
//!
//! let record = driver.get(&users, &id).await.unwrap();
//! assert_eq!(record["id"], id.as_str());
//! assert_eq!(record["name"], "Ada");
//!
//! driver.del(&users, &Identifier::from(id.as_str())).await.unwrap();
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod config;
pub mod core;
pub mod driver;
pub mod error;
pub mod types;

pub use config::DriverConfig;
pub use driver::DocumentStoreDriver;
pub use error::{DriverError, DriverResult, StoreError};
