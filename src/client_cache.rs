//! Single-slot keyed client cache.
//!
//! [`ClientCache`] memoizes the client built for the most recently requested
//! key. Repeated lookups with the same key return the held handle without
//! touching the factory; a lookup with a different key rebuilds through the
//! [`ClientFactory`] and replaces the slot. Factory failures never disturb
//! what the slot already holds.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::metrics;

/// Builds the client for a cache key. Implementations decide what a key means
/// (chain name, endpoint URL) and how expensive construction is.
#[async_trait]
pub trait ClientFactory<K>: Send + Sync {
    type Client: Send + Sync;

    async fn create(&self, key: &K) -> Result<Arc<Self::Client>>;
}

/// Keyed cache holding at most one client.
///
/// The factory runs with the slot lock released, so concurrent lookups may
/// both build; whichever store finishes last occupies the slot. Callers
/// always receive the client built for the key they asked for.
pub struct ClientCache<K, F: ClientFactory<K>> {
    name: String,
    factory: F,
    slot: Mutex<Option<(K, Arc<F::Client>)>>,
}

impl<K, F> ClientCache<K, F>
where
    K: Clone + PartialEq + fmt::Display + Send + Sync,
    F: ClientFactory<K>,
{
    pub fn new(name: impl Into<String>, factory: F) -> Self {
        Self {
            name: name.into(),
            factory,
            slot: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the client for `key`, building it on a key change or cold start.
    pub async fn get(&self, key: &K) -> Result<Arc<F::Client>> {
        {
            let slot = self.slot.lock().unwrap();
            if let Some((held_key, client)) = slot.as_ref() {
                if held_key == key {
                    metrics::increment_cache_hit(&self.name);
                    debug!("{}: Using cached client for '{}'", self.name, key);
                    return Ok(Arc::clone(client));
                }
            }
        }

        metrics::increment_cache_miss(&self.name);
        debug!("{}: Building new client for '{}'", self.name, key);
        let client = self.factory.create(key).await?;

        let mut slot = self.slot.lock().unwrap();
        *slot = Some((key.clone(), Arc::clone(&client)));
        metrics::set_cache_occupied(&self.name, true);
        Ok(client)
    }

    /// Key of the currently held client, without triggering construction.
    pub fn cached_key(&self) -> Option<K> {
        self.slot.lock().unwrap().as_ref().map(|(key, _)| key.clone())
    }

    /// Empties the slot. The next `get` rebuilds regardless of key.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap();
        if slot.take().is_some() {
            debug!("{}: Invalidated", self.name);
        }
        metrics::set_cache_occupied(&self.name, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoFactory;

    #[async_trait]
    impl ClientFactory<String> for EchoFactory {
        type Client = String;

        async fn create(&self, key: &String) -> Result<Arc<String>> {
            Ok(Arc::new(key.clone()))
        }
    }

    #[test]
    fn fresh_cache_is_empty_and_invalidation_is_idempotent() {
        let cache = ClientCache::new("test", EchoFactory);
        assert_eq!(cache.cached_key(), None);
        cache.invalidate();
        assert_eq!(cache.cached_key(), None);
    }

    #[tokio::test]
    async fn stores_the_requested_key() {
        let cache = ClientCache::new("test", EchoFactory);
        let client = cache.get(&"chain".to_string()).await.unwrap();
        assert_eq!(*client, "chain");
        assert_eq!(cache.cached_key().as_deref(), Some("chain"));
        cache.invalidate();
        assert_eq!(cache.cached_key(), None);
    }
}
