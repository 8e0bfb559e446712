//! Elasticsearch backend integration tests.
//!
//! Configuration and client construction are tested without a cluster. The
//! `es_integration` module spins up a real Elasticsearch node with
//! testcontainers and drives [`DocumentStoreDriver`] against it.
//!
//! Run with: `cargo test -p osmos-elastic --features elasticsearch -- elasticsearch`
//!
//! Skip if no Docker:
//!   `cargo test -p osmos-elastic -- --skip es_integration`

#![cfg(feature = "elasticsearch")]

mod common;

use osmos_elastic::backends::elasticsearch::ElasticsearchClient;
use osmos_elastic::config::ElasticsearchAuth;
use osmos_elastic::core::DocumentStoreApi;
use osmos_elastic::{DocumentStoreDriver, DriverConfig, DriverError};

// ============================================================================
// Configuration Tests (no ES instance required)
// ============================================================================

#[test]
fn test_driver_config_defaults() {
    let config = DriverConfig::default();
    assert_eq!(config.nodes, vec!["http://localhost:9200".to_string()]);
    assert_eq!(config.index, "osmos");
    assert_eq!(config.number_of_replicas, 1);
    assert_eq!(config.find_size_ceiling, 10_000);
    assert!(config.auth.is_none());
}

#[test]
fn test_driver_config_serialization() {
    let config = DriverConfig {
        nodes: vec!["http://es1:9200".to_string()],
        index: "shop".to_string(),
        auth: Some(ElasticsearchAuth::Basic {
            username: "elastic".to_string(),
            password: "changeme".to_string(),
        }),
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: DriverConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.nodes, config.nodes);
    assert_eq!(deserialized.index, "shop");
    assert_eq!(deserialized.auth, config.auth);
}

#[test]
fn test_client_creation() {
    // Builds the transport only; no connection is made.
    let client = ElasticsearchClient::new(&DriverConfig::default()).unwrap();
    assert_eq!(client.backend_name(), "elasticsearch");
}

#[test]
fn test_driver_from_config_applies_settings() {
    let config = DriverConfig {
        index: "shop".to_string(),
        find_size_ceiling: 500,
        ..Default::default()
    };

    let driver = DocumentStoreDriver::from_config(&config).unwrap();
    assert_eq!(driver.index(), "shop");
    assert_eq!(driver.find_size_ceiling(), 500);
}

#[test]
fn test_driver_from_config_rejects_invalid() {
    let config = DriverConfig {
        nodes: Vec::new(),
        index: "Shop".to_string(),
        ..Default::default()
    };

    let err = DocumentStoreDriver::from_config(&config).unwrap_err();
    assert!(matches!(err, DriverError::InvalidArgument { .. }));
}

// ============================================================================
// Integration Tests (requires Docker for testcontainers)
// ============================================================================

/// Integration tests that require a real Elasticsearch instance via testcontainers.
///
/// Every test gets its own index name, so one container serves the whole run.
#[cfg(test)]
mod es_integration {
    use serde_json::json;

    use osmos_elastic::backends::elasticsearch::ElasticsearchClient;
    use osmos_elastic::core::ModelStorage;
    use osmos_elastic::error::{DriverError, StoreError};
    use osmos_elastic::types::{Document, Identifier, Model};
    use osmos_elastic::{DocumentStoreDriver, DriverConfig};

    use testcontainers::ImageExt;
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::elastic_search::ElasticSearch;
    use tokio::sync::OnceCell;

    use super::common::{init_tracing, record, users};

    /// Shared Elasticsearch container reused across all tests in this module.
    struct SharedEs {
        host: String,
        port: u16,
        /// Kept alive for the duration of the test binary; dropped at process exit.
        _container: testcontainers::ContainerAsync<ElasticSearch>,
    }

    static SHARED_ES: OnceCell<SharedEs> = OnceCell::const_new();

    async fn shared_es() -> &'static SharedEs {
        SHARED_ES
            .get_or_init(|| async {
                let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_default();
                let container = ElasticSearch::default()
                    .with_env_var("ES_JAVA_OPTS", "-Xms256m -Xmx256m")
                    .with_label("github.run_id", &run_id)
                    .with_startup_timeout(std::time::Duration::from_secs(120))
                    .start()
                    .await
                    .expect("Failed to start Elasticsearch container");

                let port = container
                    .get_host_port_ipv4(9200)
                    .await
                    .expect("Failed to get host port");

                let host = container
                    .get_host()
                    .await
                    .expect("Failed to get host")
                    .to_string();

                SharedEs {
                    host,
                    port,
                    _container: container,
                }
            })
            .await
    }

    /// Builds a configuration pointing at the shared container with a unique index.
    async fn test_config() -> DriverConfig {
        init_tracing();
        let es = shared_es().await;

        DriverConfig {
            nodes: vec![format!("http://{}:{}", es.host, es.port)],
            index: format!("osmos_{}", uuid::Uuid::new_v4().simple()),
            number_of_replicas: 0, // single node
            ..Default::default()
        }
    }

    /// Creates a driver connected to the shared container with a unique index.
    async fn create_driver() -> DocumentStoreDriver<ElasticsearchClient> {
        let config = test_config().await;
        DocumentStoreDriver::from_config(&config).expect("Failed to create driver")
    }

    // ========================================================================
    // Health
    // ========================================================================

    #[tokio::test]
    async fn es_integration_health_check() {
        let driver = create_driver().await;
        driver.health_check().await.unwrap();
    }

    // ========================================================================
    // Index creation
    // ========================================================================

    #[tokio::test]
    async fn es_integration_create_indices() {
        let driver = create_driver().await;

        driver
            .create_indices(
                &users(),
                json!({
                    "timeout": "30s",
                    "master_timeout": "30s",
                    "body": {
                        "settings": {"number_of_replicas": 0},
                        "mappings": {"properties": {"role": {"type": "keyword"}}}
                    }
                }),
            )
            .await
            .unwrap();

        let again = driver.create_indices(&users(), json!({})).await;
        assert!(matches!(
            again,
            Err(DriverError::Store(StoreError::Status { status: 400, .. }))
        ));
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    #[tokio::test]
    async fn es_integration_post_and_get() {
        let driver = create_driver().await;

        let saved = driver
            .post(&Document::new(users()), record(json!({"name": "Ada"})))
            .await
            .unwrap();
        let id = saved.primary_key().unwrap().to_string();
        assert!(!id.is_empty());

        let user = driver.get(&users(), &id).await.unwrap();
        assert_eq!(user["id"], id.as_str());
        assert_eq!(user["name"], "Ada");
    }

    #[tokio::test]
    async fn es_integration_writes_with_default_replicas() {
        // One replica that a single node can never allocate.
        let config = DriverConfig {
            number_of_replicas: DriverConfig::default().number_of_replicas,
            request_timeout_ms: 10_000,
            ..test_config().await
        };
        let driver = DocumentStoreDriver::from_config(&config).unwrap();
        let doc = Document::new(users()).with_primary_key("u-1");

        let saved = driver.post(&doc, record(json!({"name": "Ada"}))).await.unwrap();
        let persisted = saved.with_original_data(record(json!({"id": "u-1"})));
        driver
            .put(&persisted, record(json!({"name": "Ada L."})), &[])
            .await
            .unwrap();
        assert_eq!(driver.get(&users(), "u-1").await.unwrap()["name"], "Ada L.");

        driver.del(&users(), &Identifier::from("u-1")).await.unwrap();
    }

    #[tokio::test]
    async fn es_integration_get_missing() {
        let driver = create_driver().await;
        driver
            .post(&Document::new(users()), record(json!({"name": "Ada"})))
            .await
            .unwrap();

        let result = driver.get(&users(), "missing").await;
        assert!(matches!(result, Err(DriverError::NotFound { .. })));
    }

    #[tokio::test]
    async fn es_integration_put_diff() {
        let driver = create_driver().await;
        let doc = Document::new(users()).with_primary_key("u-1");
        driver
            .post(&doc, record(json!({"name": "Ada", "nickname": "Countess"})))
            .await
            .unwrap();

        let persisted = doc.with_original_data(record(json!({"id": "u-1", "name": "Ada"})));
        driver
            .put(
                &persisted,
                record(json!({"age": 36})),
                &["nickname".to_string()],
            )
            .await
            .unwrap();

        let user = driver.get(&users(), "u-1").await.unwrap();
        assert_eq!(user["name"], "Ada");
        assert_eq!(user["age"], 36);
        assert!(user["nickname"].is_null());
    }

    #[tokio::test]
    async fn es_integration_put_redirects_to_post() {
        let driver = create_driver().await;
        let doc = Document::new(users()).with_primary_key("fresh");

        driver
            .put(&doc, record(json!({"name": "Grace"})), &[])
            .await
            .unwrap();

        let user = driver.get(&users(), "fresh").await.unwrap();
        assert_eq!(user["name"], "Grace");
    }

    #[tokio::test]
    async fn es_integration_del() {
        let driver = create_driver().await;
        for id in ["a", "b"] {
            driver
                .post(
                    &Document::new(users()).with_primary_key(id),
                    record(json!({"name": id})),
                )
                .await
                .unwrap();
        }

        driver.del(&users(), &Identifier::from("a")).await.unwrap();
        driver
            .del(&users(), &Identifier::from(record(json!({"id": "b"}))))
            .await
            .unwrap();

        assert!(matches!(
            driver.get(&users(), "a").await,
            Err(DriverError::NotFound { .. })
        ));
        assert!(matches!(
            driver.del(&users(), &Identifier::from("b")).await,
            Err(DriverError::NotFound { .. })
        ));
    }

    // ========================================================================
    // Search
    // ========================================================================

    async fn seed_roles(driver: &DocumentStoreDriver<ElasticsearchClient>) {
        for (id, role) in [("a", "admin"), ("b", "user"), ("c", "admin")] {
            driver
                .post(
                    &Document::new(users()).with_primary_key(id),
                    record(json!({"role": role})),
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn es_integration_find_and_count() {
        let driver = create_driver().await;
        seed_roles(&driver).await;
        let admins = record(json!({"query": {"term": {"role.keyword": "admin"}}}));

        let found = driver.find(&users(), &admins).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|user| user["role"] == "admin"));

        assert_eq!(driver.count(&users(), &admins).await.unwrap(), 2);
        assert_eq!(driver.count(&users(), &record(json!({}))).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn es_integration_search_empty_bucket() {
        let driver = create_driver().await;
        let spec = record(json!({"query": {"match_all": {}}}));

        assert!(driver.find_one(&users(), &spec).await.unwrap().is_none());
        assert!(driver.find(&users(), &spec).await.unwrap().is_empty());
        assert_eq!(driver.count(&users(), &spec).await.unwrap(), 0);

        let page = driver.find_limit(&users(), &spec, 0, 10).await.unwrap();
        assert!(page.docs.is_empty());
        assert_eq!(page.count, 0);
    }

    #[tokio::test]
    async fn es_integration_find_one() {
        let driver = create_driver().await;
        seed_roles(&driver).await;

        let found = driver
            .find_one(
                &users(),
                &record(json!({"query": {"term": {"role.keyword": "user"}}})),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["id"], "b");

        let none = driver
            .find_one(
                &users(),
                &record(json!({"query": {"term": {"role.keyword": "guest"}}})),
            )
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn es_integration_find_limit() {
        let driver = create_driver().await;
        for n in 0..25 {
            driver
                .post(
                    &Document::new(users()).with_primary_key(format!("u-{:02}", n)),
                    record(json!({"n": n})),
                )
                .await
                .unwrap();
        }

        let page = driver
            .find_limit(
                &users(),
                &record(json!({"sort": [{"n": "asc"}]})),
                20,
                10,
            )
            .await
            .unwrap();

        assert_eq!(page.start, 20);
        assert_eq!(page.limit, 10);
        assert_eq!(page.count, 25);
        assert_eq!(page.docs.len(), 5);
        assert_eq!(page.docs[0]["id"], "u-20");
    }

    #[tokio::test]
    async fn es_integration_invalid_query_surfaces_error() {
        let driver = create_driver().await;
        seed_roles(&driver).await;

        let result = driver
            .find(&users(), &record(json!({"query": {"no_such_query": {}}})))
            .await;
        assert!(matches!(
            result,
            Err(DriverError::Store(StoreError::Status { status: 400, .. }))
        ));
    }

    #[tokio::test]
    async fn es_integration_buckets_are_isolated() {
        let driver = create_driver().await;
        let admins = Model::new("admins").with_primary_key("id");
        driver
            .post(
                &Document::new(admins.clone()).with_primary_key("x"),
                record(json!({"name": "Root"})),
            )
            .await
            .unwrap();
        driver
            .post(
                &Document::new(users()).with_primary_key("y"),
                record(json!({"name": "Ada"})),
            )
            .await
            .unwrap();

        assert_eq!(driver.count(&admins, &record(json!({}))).await.unwrap(), 1);
        assert!(matches!(
            driver.get(&users(), "x").await,
            Err(DriverError::NotFound { .. })
        ));
    }
}
