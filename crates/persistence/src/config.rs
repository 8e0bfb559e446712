//! Driver configuration.
//!
//! [`DriverConfig`] can be built programmatically, deserialized, or read from
//! environment variables with [`DriverConfig::from_env`].
//!
//! # Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `OSMOS_ES_NODES` | `nodes` (comma-separated) |
//! | `OSMOS_ES_INDEX` | `index` |
//! | `OSMOS_ES_REPLICAS` | `number_of_replicas` |
//! | `OSMOS_ES_FIND_CEILING` | `find_size_ceiling` |
//! | `OSMOS_ES_TIMEOUT_MS` | `request_timeout_ms` |
//! | `OSMOS_ES_USERNAME` / `OSMOS_ES_PASSWORD` | basic `auth` |
//! | `OSMOS_ES_TOKEN` | bearer `auth` |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// Configuration for the storage driver and its Elasticsearch client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    #[serde(default = "default_nodes")]
    pub nodes: Vec<String>,

    /// Index holding every bucket of this driver (default: `"osmos"`).
    #[serde(default = "default_index")]
    pub index: String,

    /// Replica shards per index (default: 1). Used to size quorum writes.
    #[serde(default = "default_replicas")]
    pub number_of_replicas: u32,

    /// `size` sent by `find` and `count` (default: 10000, the engine's
    /// default `index.max_result_window`).
    #[serde(default = "default_find_size_ceiling")]
    pub find_size_ceiling: u64,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_nodes() -> Vec<String> {
    vec!["http://localhost:9200".to_string()]
}

fn default_index() -> String {
    "osmos".to_string()
}

fn default_replicas() -> u32 {
    1
}

fn default_find_size_ceiling() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            index: default_index(),
            number_of_replicas: default_replicas(),
            find_size_ceiling: default_find_size_ceiling(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

impl DriverConfig {
    /// Creates a configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(nodes) = lookup("OSMOS_ES_NODES") {
            let nodes: Vec<String> = nodes
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if !nodes.is_empty() {
                config.nodes = nodes;
            }
        }
        if let Some(index) = lookup("OSMOS_ES_INDEX") {
            config.index = index;
        }
        if let Some(replicas) = parse_var(&lookup, "OSMOS_ES_REPLICAS") {
            config.number_of_replicas = replicas;
        }
        if let Some(ceiling) = parse_var(&lookup, "OSMOS_ES_FIND_CEILING") {
            config.find_size_ceiling = ceiling;
        }
        if let Some(timeout) = parse_var(&lookup, "OSMOS_ES_TIMEOUT_MS") {
            config.request_timeout_ms = timeout;
        }

        config.auth = match (
            lookup("OSMOS_ES_USERNAME"),
            lookup("OSMOS_ES_PASSWORD"),
            lookup("OSMOS_ES_TOKEN"),
        ) {
            (_, _, Some(token)) => Some(ElasticsearchAuth::Bearer { token }),
            (Some(username), Some(password), None) => {
                Some(ElasticsearchAuth::Basic { username, password })
            }
            (Some(_), None, None) => {
                tracing::warn!("OSMOS_ES_USERNAME set without OSMOS_ES_PASSWORD; ignoring");
                None
            }
            _ => None,
        };

        config
    }

    /// Validates the configuration, returning every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.nodes.is_empty() {
            errors.push("at least one Elasticsearch node is required".to_string());
        }
        if self.index.is_empty() {
            errors.push("index name must not be empty".to_string());
        } else if self.index.chars().any(|c| c.is_ascii_uppercase()) {
            errors.push(format!("index name '{}' must be lowercase", self.index));
        }
        if self.find_size_ceiling == 0 {
            errors.push("find_size_ceiling must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            errors.push("request_timeout_ms must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = key, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}
