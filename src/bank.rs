// src/bank.rs
// Bank balance wrappers over the cached query client

use anyhow::Result;
use rust_decimal::Decimal;

use crate::client_cache::{ClientCache, ClientFactory};
use crate::query_client::QueryClient;
use crate::types::{display_amount, AssetInfo, Coin};

/// Bank balance queries against whichever chain was asked for last.
///
/// Owns a [`ClientCache`] keyed by chain name: consecutive calls for the same
/// chain share one query client, switching chains rebuilds it.
pub struct BankQuerier<F>
where
    F: ClientFactory<String>,
    F::Client: QueryClient,
{
    cache: ClientCache<String, F>,
}

impl<F> BankQuerier<F>
where
    F: ClientFactory<String>,
    F::Client: QueryClient,
{
    pub fn new(factory: F) -> Self {
        Self {
            cache: ClientCache::new("bank_query_client", factory),
        }
    }

    /// The underlying cache, for probing and invalidation.
    pub fn cache(&self) -> &ClientCache<String, F> {
        &self.cache
    }

    /// Every balance `address` holds on `chain`, in base denominations.
    pub async fn all_balances(&self, chain: &str, address: &str) -> Result<Vec<Coin>> {
        let client = self.cache.get(&chain.to_string()).await?;
        Ok(client.all_balances(address).await?)
    }

    /// The balance of `address` on `chain` for a single denom.
    pub async fn balance(&self, chain: &str, address: &str, denom: &str) -> Result<Option<Coin>> {
        let client = self.cache.get(&chain.to_string()).await?;
        Ok(client.balance(address, denom).await?)
    }

    /// The balance of `address` in the asset's display denomination, zero when
    /// the account holds none of it.
    pub async fn display_balance(
        &self,
        chain: &str,
        address: &str,
        asset: &AssetInfo,
    ) -> Result<Decimal> {
        match self.balance(chain, address, &asset.base).await? {
            Some(coin) => Ok(display_amount(&coin, asset)?),
            None => Ok(Decimal::ZERO),
        }
    }
}
