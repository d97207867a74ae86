// src/client_factory.rs
// Builds query clients from registry-resolved endpoints, first healthy wins

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::client_cache::ClientFactory;
use crate::metrics;
use crate::query_client::{ClientError, HttpQueryClient, QueryClient};
use crate::registry::ChainRegistry;
use crate::settings::ClientSettings;

/// [`ClientFactory`] keyed by chain name.
///
/// Resolves the chain's REST endpoints through the registry, then probes them
/// in order until one answers with the expected chain id. Probe failures are
/// logged and the next endpoint is tried; only when every candidate fails does
/// construction error out.
pub struct RegistryClientFactory {
    registry: Arc<ChainRegistry>,
    client_settings: ClientSettings,
}

impl RegistryClientFactory {
    pub fn new(registry: Arc<ChainRegistry>, client_settings: ClientSettings) -> Self {
        Self {
            registry,
            client_settings,
        }
    }

    async fn probe(
        &self,
        endpoint: &str,
        expected_chain_id: Option<&str>,
    ) -> Result<HttpQueryClient, ClientError> {
        let timeout = Duration::from_millis(self.client_settings.request_timeout_ms);
        let client = HttpQueryClient::new(endpoint, timeout)?;
        let network = client.chain_id().await?;
        if let Some(expected) = expected_chain_id {
            if network != expected {
                return Err(ClientError::ChainIdMismatch {
                    expected: expected.to_string(),
                    actual: network,
                });
            }
        }
        Ok(client)
    }
}

#[async_trait]
impl ClientFactory<String> for RegistryClientFactory {
    type Client = HttpQueryClient;

    async fn create(&self, chain: &String) -> Result<Arc<HttpQueryClient>> {
        let endpoints = self.registry.endpoints(chain).await?;
        if endpoints.rest.is_empty() {
            metrics::increment_client_build_failure(chain);
            return Err(ClientError::NoEndpoint(chain.clone()).into());
        }

        let expected = if self.client_settings.verify_chain_id {
            endpoints.chain_id.as_deref()
        } else {
            None
        };

        let mut last_error: Option<ClientError> = None;
        for (attempt, endpoint) in endpoints
            .rest
            .iter()
            .take(self.client_settings.max_endpoint_attempts)
            .enumerate()
        {
            match self.probe(endpoint, expected).await {
                Ok(client) => {
                    info!(chain = %chain, endpoint = %endpoint, "Query client ready");
                    metrics::increment_client_build(chain);
                    return Ok(Arc::new(client));
                }
                Err(e) => {
                    warn!(chain = %chain, endpoint = %endpoint, attempt, error = %e, "Endpoint probe failed");
                    last_error = Some(e);
                }
            }
        }

        metrics::increment_client_build_failure(chain);
        let error = last_error.unwrap_or_else(|| ClientError::NoEndpoint(chain.clone()));
        Err(anyhow::Error::new(error)
            .context(format!("no healthy REST endpoint for chain '{}'", chain)))
    }
}
