// src/registry.rs
// Chain registry resolution: configured endpoints first, remote directory second

use anyhow::{Context, Result};
use dashmap::DashMap;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use url::Url;

use crate::metrics;
use crate::settings::{ChainSettings, Settings};

/// Endpoint set resolved for a single chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEndpoints {
    /// Expected network identifier, when the registry or configuration knows it
    pub chain_id: Option<String>,
    pub rpc: Vec<String>,
    pub rest: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEndpoint {
    pub address: String,
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSet {
    #[serde(default)]
    pub rpc: Vec<ApiEndpoint>,
    #[serde(default)]
    pub rest: Vec<ApiEndpoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ChainEntry {
    #[serde(default)]
    chain_id: Option<String>,
    #[serde(default)]
    apis: Option<ApiSet>,
    #[serde(default)]
    best_apis: Option<ApiSet>,
}

/// Registry documents come in two shapes: directory services wrap the chain
/// entry under a `chain` key, raw registry files are the entry itself.
#[derive(Debug, Deserialize)]
struct ChainDocument {
    #[serde(default)]
    chain: Option<ChainEntry>,
    #[serde(flatten)]
    top: ChainEntry,
}

impl ChainDocument {
    fn into_endpoints(self) -> (Option<String>, ApiSet) {
        let entry = self.chain.unwrap_or(self.top);
        // Health-checked endpoints take precedence when the directory publishes them
        let apis = entry.best_apis.or(entry.apis).unwrap_or_default();
        (entry.chain_id, apis)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("chain '{0}' is not configured and remote lookups are disabled")]
    UnknownChain(String),
    #[error("chain '{0}' is not present in the registry")]
    NotFound(String),
    #[error("registry lookup for '{chain}' failed: {source}")]
    Fetch {
        chain: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("registry document for '{chain}' is invalid: {reason}")]
    InvalidDocument { chain: String, reason: String },
    #[error("no usable endpoints published for chain '{0}'")]
    NoEndpoints(String),
}

/// Resolves chain names to endpoint sets.
///
/// Resolution order: memoized results, configured overrides, then the remote
/// registry directory. Remote lookups retry transient failures with jittered
/// exponential backoff and results are memoized for the registry's lifetime.
pub struct ChainRegistry {
    http: reqwest::Client,
    base_url: Option<String>,
    overrides: HashMap<String, ChainSettings>,
    memo: DashMap<String, ChainEndpoints>,
    retry_attempts: u32,
    retry_base_ms: u64,
}

impl ChainRegistry {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let raw_base = settings.registry.base_url.trim().trim_end_matches('/');
        let base_url = if raw_base.is_empty() {
            None
        } else {
            Url::parse(raw_base)
                .with_context(|| format!("invalid registry base URL '{}'", raw_base))?;
            Some(raw_base.to_string())
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.registry.request_timeout_ms))
            .build()
            .context("failed to build registry HTTP client")?;
        Ok(Self {
            http,
            base_url,
            overrides: settings.chains.clone(),
            memo: DashMap::new(),
            retry_attempts: settings.registry.retry_attempts,
            retry_base_ms: settings.registry.retry_base_ms,
        })
    }

    /// Resolves the endpoint set for a chain.
    pub async fn endpoints(&self, chain: &str) -> Result<ChainEndpoints, RegistryError> {
        if let Some(hit) = self.memo.get(chain) {
            metrics::record_registry_lookup("memo");
            return Ok(hit.clone());
        }

        let configured = self.overrides.get(chain);
        if let Some(cfg) = configured {
            if !cfg.rest.is_empty() || !cfg.rpc.is_empty() {
                let endpoints = ChainEndpoints {
                    chain_id: cfg.chain_id.clone(),
                    rpc: cfg.rpc.clone(),
                    rest: cfg.rest.clone(),
                };
                debug!("Chain '{}' resolved from configured endpoints", chain);
                metrics::record_registry_lookup("config");
                self.memo.insert(chain.to_string(), endpoints.clone());
                return Ok(endpoints);
            }
        }

        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => {
                metrics::increment_registry_failure(chain);
                return Err(RegistryError::UnknownChain(chain.to_string()));
            }
        };

        match self.fetch_endpoints(&base, chain).await {
            Ok(mut endpoints) => {
                // A configured chain id pins the expected network even when the
                // endpoints themselves come from the registry
                if let Some(cfg) = configured {
                    if cfg.chain_id.is_some() {
                        endpoints.chain_id = cfg.chain_id.clone();
                    }
                }
                if endpoints.rest.is_empty() && endpoints.rpc.is_empty() {
                    metrics::increment_registry_failure(chain);
                    return Err(RegistryError::NoEndpoints(chain.to_string()));
                }
                metrics::record_registry_lookup("remote");
                self.memo.insert(chain.to_string(), endpoints.clone());
                Ok(endpoints)
            }
            Err(e) => {
                warn!("Registry lookup for '{}' failed: {}", chain, e);
                metrics::increment_registry_failure(chain);
                Err(e)
            }
        }
    }

    /// Drops the memoized endpoints for a chain so the next lookup re-resolves.
    pub fn forget(&self, chain: &str) {
        self.memo.remove(chain);
    }

    async fn fetch_endpoints(&self, base: &str, chain: &str) -> Result<ChainEndpoints, RegistryError> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.retry_base_ms.max(2) / 2)
            .map(jitter)
            .take(self.retry_attempts as usize);
        let document =
            RetryIf::spawn(strategy, || self.fetch_document(base, chain), is_transient).await?;
        let (chain_id, apis) = document.into_endpoints();
        Ok(ChainEndpoints {
            chain_id,
            rpc: apis.rpc.into_iter().map(|e| e.address).collect(),
            rest: apis.rest.into_iter().map(|e| e.address).collect(),
        })
    }

    async fn fetch_document(&self, base: &str, chain: &str) -> Result<ChainDocument, RegistryError> {
        let url = format!("{}/{}", base, chain);
        debug!("Fetching chain registry document from {}", url);
        let response = self.http.get(&url).send().await.map_err(|e| RegistryError::Fetch {
            chain: chain.to_string(),
            source: e,
        })?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(chain.to_string()));
        }
        let response = response.error_for_status().map_err(|e| RegistryError::Fetch {
            chain: chain.to_string(),
            source: e,
        })?;
        response
            .json::<ChainDocument>()
            .await
            .map_err(|e| RegistryError::InvalidDocument {
                chain: chain.to_string(),
                reason: e.to_string(),
            })
    }
}

fn is_transient(error: &RegistryError) -> bool {
    match error {
        RegistryError::Fetch { source, .. } => {
            source.is_timeout()
                || source.is_connect()
                || source.status().map_or(false, |s| s.is_server_error())
        }
        _ => false,
    }
}
