//! Elasticsearch client implementation.
//!
//! # Buckets on a typeless engine
//!
//! Elasticsearch 7+ no longer has mapping types, so each bucket of the
//! configured index is stored in its own physical index named
//! `{index}_{bucket}` (lower-cased). `users` in index `osmos` lives in
//! `osmos_users`.
//!
//! # Write durability
//!
//! `refresh = true` maps onto `refresh=true`. Quorum consistency maps onto
//! `wait_for_active_shards` set to a majority of the shard copies implied by
//! `number_of_replicas`.
//!
//! # Example
//!
//! ```ignore
//! use osmos_elastic::backends::elasticsearch::ElasticsearchClient;
//! use osmos_elastic::{DocumentStoreDriver, DriverConfig};
//!
//! let config = DriverConfig {
//!     nodes: vec!["http://localhost:9200".to_string()],
//!     index: "shop".to_string(),
//!     ..Default::default()
//! };
//! let driver = DocumentStoreDriver::from_config(&config)?;
//! driver.health_check().await?;
//! ```

mod backend;
mod wire;

pub use backend::ElasticsearchClient;
