//! Shared fixtures for driver integration tests.

#![allow(dead_code)]

use std::sync::Once;

use serde_json::Value;

use osmos_elastic::DocumentStoreDriver;
use osmos_elastic::backends::memory::InMemoryStore;
use osmos_elastic::types::{Model, Record};

/// Index used by every in-memory test driver.
pub const INDEX: &str = "osmos";

static TRACING: Once = Once::new();

/// Installs a test subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Creates a driver over a fresh in-memory store.
pub fn create_driver() -> DocumentStoreDriver<InMemoryStore> {
    init_tracing();
    DocumentStoreDriver::new(InMemoryStore::new(), INDEX)
}

/// A `users` model keyed by `id`.
pub fn users() -> Model {
    Model::new("users").with_primary_key("id")
}

/// Converts a JSON object literal into a [`Record`].
pub fn record(value: Value) -> Record {
    value
        .as_object()
        .cloned()
        .expect("fixture must be a JSON object")
}
