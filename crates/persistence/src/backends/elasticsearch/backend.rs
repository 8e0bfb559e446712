//! Elasticsearch client implementation.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::cluster::ClusterHealthParts;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::indices::IndicesCreateParts;
use elasticsearch::params::Refresh;
use elasticsearch::{DeleteParts, Elasticsearch, GetParts, IndexParts, SearchParts, UpdateParts};
use serde_json::{Value, json};

use crate::config::{DriverConfig, ElasticsearchAuth};
use crate::core::{
    CreateIndexRequest, DeleteRequest, DocumentStoreApi, GetRequest, IndexRequest,
    SearchRequest, SearchResponse, StoredDocument, UpdateRequest,
};
use crate::error::{StoreError, StoreResult};

use super::wire;

fn transport_error(err: elasticsearch::Error) -> StoreError {
    StoreError::Transport {
        message: err.to_string(),
    }
}

fn parse_error(err: elasticsearch::Error) -> StoreError {
    StoreError::Parse {
        message: err.to_string(),
    }
}

fn refresh(enabled: bool) -> Refresh {
    if enabled { Refresh::True } else { Refresh::False }
}

/// Turns a non-success response into [`StoreError::Status`].
async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// [`DocumentStoreApi`] over the official Elasticsearch client.
pub struct ElasticsearchClient {
    client: Elasticsearch,
    number_of_replicas: u32,
}

impl Debug for ElasticsearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchClient")
            .field("number_of_replicas", &self.number_of_replicas)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchClient {
    /// Builds a client from configuration. Does not connect.
    pub fn new(config: &DriverConfig) -> StoreResult<Self> {
        let client = Self::build_client(config)?;
        tracing::info!(
            node = config.nodes.first().map(String::as_str).unwrap_or("http://localhost:9200"),
            index = %config.index,
            "Elasticsearch client initialized"
        );
        Ok(Self {
            client,
            number_of_replicas: config.number_of_replicas,
        })
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Elasticsearch, number_of_replicas: u32) -> Self {
        Self {
            client,
            number_of_replicas,
        }
    }

    /// Returns the underlying Elasticsearch client.
    pub fn client(&self) -> &Elasticsearch {
        &self.client
    }

    /// Builds the Elasticsearch client from configuration.
    fn build_client(config: &DriverConfig) -> StoreResult<Elasticsearch> {
        let url = config
            .nodes
            .first()
            .cloned()
            .unwrap_or_else(|| "http://localhost:9200".to_string());

        let parsed_url: elasticsearch::http::Url =
            url.parse().map_err(|e| StoreError::InvalidRequest {
                message: format!("Invalid URL {}: {}", url, e),
            })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                ElasticsearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                ElasticsearchAuth::Bearer { token } => {
                    builder.auth(Credentials::Bearer(token.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| StoreError::Transport {
            message: format!("Failed to build transport: {}", e),
        })?;

        Ok(Elasticsearch::new(transport))
    }
}

#[async_trait]
impl DocumentStoreApi for ElasticsearchClient {
    fn backend_name(&self) -> &'static str {
        "elasticsearch"
    }

    async fn create_index(&self, request: CreateIndexRequest) -> StoreResult<()> {
        let CreateIndexRequest {
            index,
            doc_type,
            body,
            params,
        } = request;
        let physical = wire::physical_index(&index, &doc_type);
        let params = wire::CreateIndexParams::from_record(&params);

        let indices = self.client.indices();
        let mut builder = indices
            .create(IndicesCreateParts::Index(&physical))
            .body(Value::Object(body));
        if let Some(timeout) = params.timeout.as_deref() {
            builder = builder.timeout(timeout);
        }
        if let Some(master_timeout) = params.master_timeout.as_deref() {
            builder = builder.master_timeout(master_timeout);
        }
        if let Some(shards) = params.wait_for_active_shards.as_deref() {
            builder = builder.wait_for_active_shards(shards);
        }

        let response = builder.send().await.map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn get(&self, request: GetRequest) -> StoreResult<Option<StoredDocument>> {
        let physical = wire::physical_index(&request.index, &request.doc_type);

        let response = self
            .client
            .get(GetParts::IndexId(&physical, &request.id))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status_code().as_u16() == 404 {
            return Ok(None);
        }

        let body: Value = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(parse_error)?;
        wire::parse_get(body)
    }

    async fn index(&self, request: IndexRequest) -> StoreResult<String> {
        let IndexRequest {
            index,
            doc_type,
            id,
            body,
            write,
        } = request;
        let physical = wire::physical_index(&index, &doc_type);
        let shards = wire::active_shards(write.consistency, self.number_of_replicas);

        let parts = match id.as_deref() {
            Some(id) => IndexParts::IndexId(&physical, id),
            None => IndexParts::Index(&physical),
        };

        let response = self
            .client
            .index(parts)
            .body(Value::Object(body))
            .refresh(refresh(write.refresh))
            .wait_for_active_shards(&shards)
            .send()
            .await
            .map_err(transport_error)?;

        let body: Value = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(parse_error)?;
        wire::parse_index(&body)
    }

    async fn update(&self, request: UpdateRequest) -> StoreResult<()> {
        let UpdateRequest {
            index,
            doc_type,
            id,
            doc,
            write,
        } = request;
        let physical = wire::physical_index(&index, &doc_type);
        let shards = wire::active_shards(write.consistency, self.number_of_replicas);

        let response = self
            .client
            .update(UpdateParts::IndexId(&physical, &id))
            .body(json!({ "doc": doc }))
            .refresh(refresh(write.refresh))
            .wait_for_active_shards(&shards)
            .send()
            .await
            .map_err(transport_error)?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, request: DeleteRequest) -> StoreResult<bool> {
        let physical = wire::physical_index(&request.index, &request.doc_type);

        let response = self
            .client
            .delete(DeleteParts::IndexId(&physical, &request.id))
            .refresh(refresh(request.refresh))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status_code().as_u16() == 404 {
            return Ok(false);
        }

        ensure_success(response).await?;
        Ok(true)
    }

    async fn search(&self, request: SearchRequest) -> StoreResult<SearchResponse> {
        let physical = wire::physical_index(&request.index, &request.doc_type);

        let response = self
            .client
            .search(SearchParts::Index(&[&physical]))
            .ignore_unavailable(true)
            .allow_no_indices(true)
            .track_total_hits(true)
            .body(Value::Object(request.body))
            .send()
            .await
            .map_err(transport_error)?;

        let body: Value = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(parse_error)?;
        wire::parse_search(body)
    }

    async fn health_check(&self) -> StoreResult<()> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(transport_error)?;

        let body: Value = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(parse_error)?;

        let cluster_status = body
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        if cluster_status == "red" {
            return Err(StoreError::Status {
                status: 503,
                body: format!("Cluster status is red: {}", body),
            });
        }

        Ok(())
    }
}
