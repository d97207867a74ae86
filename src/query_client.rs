//! Capability-typed query clients.
//!
//! A [`QueryClient`] exposes exactly the read operations the library needs:
//! the node's chain id and bank balances. [`HttpQueryClient`] implements it
//! over a chain's REST gateway, speaking plain JSON.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

use crate::metrics;
use crate::types::Coin;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("no REST endpoint available for chain '{0}'")]
    NoEndpoint(String),
    #[error("endpoint '{url}' is not a valid URL: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("node reports chain id '{actual}', expected '{expected}'")]
    ChainIdMismatch { expected: String, actual: String },
    #[error("node did not publish its network identifier")]
    MissingChainId,
    #[error("signing rejected: {0}")]
    Signing(String),
}

/// Read-side operations against a single chain.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Network identifier the connected node reports.
    async fn chain_id(&self) -> Result<String, ClientError>;

    /// Every balance held by `address`, in base denominations.
    async fn all_balances(&self, address: &str) -> Result<Vec<Coin>, ClientError>;

    /// The balance of `address` for one denom, `None` when the node answers
    /// without a coin.
    async fn balance(&self, address: &str, denom: &str) -> Result<Option<Coin>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct DefaultNodeInfo {
    network: String,
}

#[derive(Debug, Deserialize)]
struct NodeInfoResponse {
    #[serde(default)]
    default_node_info: Option<DefaultNodeInfo>,
}

#[derive(Debug, Deserialize)]
struct AllBalancesResponse {
    #[serde(default)]
    balances: Vec<Coin>,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    #[serde(default)]
    balance: Option<Coin>,
}

/// [`QueryClient`] over a Cosmos SDK REST gateway.
///
/// The chain id is fetched once per client and memoized; balances always hit
/// the node.
#[derive(Debug)]
pub struct HttpQueryClient {
    http: reqwest::Client,
    base_url: String,
    chain_id: OnceCell<String>,
}

impl HttpQueryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| ClientError::InvalidEndpoint {
            url: base_url.to_string(),
            source: e,
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport {
                url: trimmed.to_string(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
            chain_id: OnceCell::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "GET");
        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await.map_err(|e| ClientError::Transport {
            url: url.clone(),
            source: e,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { url, status });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode { url, source: e })
    }
}

#[async_trait]
impl QueryClient for HttpQueryClient {
    async fn chain_id(&self) -> Result<String, ClientError> {
        let id = self
            .chain_id
            .get_or_try_init(|| async {
                let start = Instant::now();
                let info: NodeInfoResponse = self
                    .get_json("cosmos/base/tendermint/v1beta1/node_info", &[])
                    .await?;
                metrics::record_query_request("node_info", start.elapsed());
                info.default_node_info
                    .map(|n| n.network)
                    .filter(|n| !n.is_empty())
                    .ok_or(ClientError::MissingChainId)
            })
            .await?;
        Ok(id.clone())
    }

    async fn all_balances(&self, address: &str) -> Result<Vec<Coin>, ClientError> {
        let start = Instant::now();
        let path = format!("cosmos/bank/v1beta1/balances/{}", address);
        let response: AllBalancesResponse = self.get_json(&path, &[]).await?;
        metrics::record_query_request("all_balances", start.elapsed());
        Ok(response.balances)
    }

    async fn balance(&self, address: &str, denom: &str) -> Result<Option<Coin>, ClientError> {
        let start = Instant::now();
        let path = format!("cosmos/bank/v1beta1/balances/{}/by_denom", address);
        let response: BalanceResponse = self.get_json(&path, &[("denom", denom)]).await?;
        metrics::record_query_request("balance", start.elapsed());
        Ok(response.balance)
    }
}
