//! Core types exchanged with the ORM.
//!
//! - [`Model`], [`Schema`] - record type descriptors supplied by the ORM
//! - [`Document`] - runtime document state with its primary key and snapshot
//! - [`Identifier`] - bare or keyed document keys
//! - [`Record`] - a document body as a JSON object
//! - [`Page`] - a paginated search result
//!
//! # Example
//!
//! ```
//! use osmos_elastic::types::{Document, Identifier, Model};
//! use serde_json::json;
//!
//! let users = Model::new("users").with_primary_key("id");
//! let doc = Document::new(users.clone()).with_primary_key("abc");
//! assert!(!doc.is_persisted());
//!
//! let key: Identifier = serde_json::from_value(json!({"id": "abc"})).unwrap();
//! assert_eq!(key.resolve().unwrap(), "abc");
//! ```

mod document;
mod model;
mod pagination;

pub use document::{Document, Identifier};
pub(crate) use document::{has_value, identifier_from_value};
pub use model::{Model, Schema};
pub use pagination::Page;

/// A document body: field name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;
