//! Integration tests for the single-slot client cache
//!
//! Tests cover:
//! - Client reuse for repeated lookups with the same key
//! - Slot replacement on key change
//! - Factory failures leaving the held client untouched
//! - Explicit invalidation
//! - Concurrent lookups racing the released lock

use interchain_query_sdk::client_cache::{ClientCache, ClientFactory};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Client stub carrying the key it was built for and a build serial, so tests
/// can tell a rebuilt client from a reused one.
#[derive(Debug)]
struct FakeClient {
    key: String,
    serial: usize,
}

/// Factory that counts builds and fails for configured keys.
struct ScriptedFactory {
    calls: Arc<AtomicUsize>,
    fail_keys: Vec<String>,
    delay: Duration,
}

impl ScriptedFactory {
    fn new() -> (Self, Arc<AtomicUsize>) {
        Self::failing_on(&[])
    }

    fn failing_on(keys: &[&str]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let factory = Self {
            calls: calls.clone(),
            fail_keys: keys.iter().map(|k| k.to_string()).collect(),
            delay: Duration::ZERO,
        };
        (factory, calls)
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ClientFactory<String> for ScriptedFactory {
    type Client = FakeClient;

    async fn create(&self, key: &String) -> Result<Arc<FakeClient>> {
        let serial = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_keys.contains(key) {
            anyhow::bail!("endpoint probe failed for '{}'", key);
        }
        Ok(Arc::new(FakeClient {
            key: key.clone(),
            serial,
        }))
    }
}

/// Test that repeated lookups with one key build once and share the handle
#[tokio::test]
async fn test_same_key_returns_the_same_client_without_rebuilding() {
    let (factory, calls) = ScriptedFactory::new();
    let cache = ClientCache::new("test_cache", factory);

    let first = cache.get(&"osmosis".to_string()).await.unwrap();
    let second = cache.get(&"osmosis".to_string()).await.unwrap();

    assert!(
        Arc::ptr_eq(&first, &second),
        "Same key should return the same client instance"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1, "Factory should run once");
    assert_eq!(cache.cached_key().as_deref(), Some("osmosis"));
}

/// Test that a different key rebuilds and replaces the held client
#[tokio::test]
async fn test_key_change_replaces_the_cached_client() {
    let (factory, calls) = ScriptedFactory::new();
    let cache = ClientCache::new("test_cache", factory);

    let first = cache.get(&"osmosis".to_string()).await.unwrap();
    let second = cache.get(&"juno".to_string()).await.unwrap();

    assert_eq!(first.key, "osmosis");
    assert_eq!(second.key, "juno");
    assert_eq!(calls.load(Ordering::SeqCst), 2, "Each key should build once");
    assert_eq!(
        cache.cached_key().as_deref(),
        Some("juno"),
        "Slot should hold the most recently requested key"
    );
}

/// Test that a factory failure leaves the previously held client in place
#[tokio::test]
async fn test_factory_failure_keeps_the_previous_client() {
    let (factory, calls) = ScriptedFactory::failing_on(&["juno"]);
    let cache = ClientCache::new("test_cache", factory);

    let held = cache.get(&"osmosis".to_string()).await.unwrap();

    let err = cache.get(&"juno".to_string()).await;
    assert!(err.is_err(), "Factory failure should surface to the caller");
    assert_eq!(
        cache.cached_key().as_deref(),
        Some("osmosis"),
        "Failed build should not disturb the slot"
    );

    let again = cache.get(&"osmosis".to_string()).await.unwrap();
    assert!(
        Arc::ptr_eq(&held, &again),
        "Held client should survive a failed build for another key"
    );
    assert_eq!(
        calls.load(Ordering::SeqCst),
        2,
        "Only the first build and the failed attempt should run"
    );
}

/// Test that a failure on a cold cache leaves it empty
#[tokio::test]
async fn test_factory_failure_on_cold_cache_leaves_it_empty() {
    let (factory, calls) = ScriptedFactory::failing_on(&["juno"]);
    let cache = ClientCache::new("test_cache", factory);

    assert!(cache.get(&"juno".to_string()).await.is_err());
    assert_eq!(cache.cached_key(), None, "Nothing should be stored on failure");

    let recovered = cache.get(&"osmosis".to_string()).await.unwrap();
    assert_eq!(recovered.key, "osmosis");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// Test that factory errors reach the caller unchanged
#[tokio::test]
async fn test_factory_error_is_propagated_unchanged() {
    let (factory, _calls) = ScriptedFactory::failing_on(&["juno"]);
    let cache = ClientCache::new("test_cache", factory);

    let err = cache.get(&"juno".to_string()).await.unwrap_err();
    assert_eq!(err.to_string(), "endpoint probe failed for 'juno'");
}

/// Test that returning to an evicted key builds a fresh client
#[tokio::test]
async fn test_switching_back_builds_a_fresh_client() {
    let (factory, calls) = ScriptedFactory::new();
    let cache = ClientCache::new("test_cache", factory);

    let first = cache.get(&"osmosis".to_string()).await.unwrap();
    cache.get(&"juno".to_string()).await.unwrap();
    let rebuilt = cache.get(&"osmosis".to_string()).await.unwrap();

    assert!(
        !Arc::ptr_eq(&first, &rebuilt),
        "Evicted client should not come back"
    );
    assert_ne!(first.serial, rebuilt.serial);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

/// Test that invalidation forces a rebuild for the same key
#[tokio::test]
async fn test_invalidate_forces_a_rebuild() {
    let (factory, calls) = ScriptedFactory::new();
    let cache = ClientCache::new("test_cache", factory);

    let first = cache.get(&"osmosis".to_string()).await.unwrap();
    cache.invalidate();
    assert_eq!(cache.cached_key(), None);

    let rebuilt = cache.get(&"osmosis".to_string()).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// Test that concurrent lookups for one key each receive that key's client
#[tokio::test]
async fn test_concurrent_lookups_both_get_the_requested_key() {
    let (factory, calls) = ScriptedFactory::new();
    let factory = factory.with_delay(Duration::from_millis(20));
    let cache = ClientCache::new("test_cache", factory);

    let key = "osmosis".to_string();
    let (a, b) = tokio::join!(cache.get(&key), cache.get(&key));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.key, "osmosis");
    assert_eq!(b.key, "osmosis");
    assert_eq!(cache.cached_key().as_deref(), Some("osmosis"));
    // The lock is released while the factory runs, so overlapping misses may
    // build independently; the slot still ends up holding the requested key.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
