//! Document-store client implementations.
//!
//! | Client | Feature | Description |
//! |--------|---------|-------------|
//! | [`memory::InMemoryStore`] | always | In-process store for tests and embedding |
//! | `elasticsearch::ElasticsearchClient` | `elasticsearch` | Elasticsearch over HTTP |
//!
//! # Example
//!
//! ```
//! use osmos_elastic::backends::memory::InMemoryStore;
//! use osmos_elastic::DocumentStoreDriver;
//!
//! let driver = DocumentStoreDriver::new(InMemoryStore::new(), "osmos");
//! assert_eq!(driver.index(), "osmos");
//! ```

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;

pub mod memory;
