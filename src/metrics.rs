// src/metrics.rs

#[cfg(feature = "observability")]
pub use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
    increment_counter, Unit,
};

// NOTE: When observability feature is disabled, provide stub implementations
#[cfg(not(feature = "observability"))]
pub enum Unit {}

// Macros for metrics when observability is disabled
#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! counter {
    ($name:expr, $value:expr $(, $label:expr => $label_value:expr)* $(,)?) => {};
    ($name:expr $(, $label:expr => $label_value:expr)* $(,)?) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! gauge {
    ($name:expr, $value:expr $(, $label:expr => $label_value:expr)* $(,)?) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! histogram {
    ($name:expr, $value:expr $(, $label:expr => $label_value:expr)* $(,)?) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! increment_counter {
    ($name:expr $(, $label:expr => $label_value:expr)* $(,)?) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! describe_counter {
    ($name:expr, $unit:expr, $desc:expr) => {};
    ($name:expr, $desc:expr) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! describe_gauge {
    ($name:expr, $desc:expr) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! describe_histogram {
    ($name:expr, $unit:expr, $desc:expr) => {};
    ($name:expr, $desc:expr) => {};
}

// Re-export macros for use in this module when observability is disabled
#[cfg(not(feature = "observability"))]
use crate::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};

/// Initializes the descriptions for all the metrics in the library.
/// This should be called once at startup.
pub fn describe_metrics() {
    // Cache metrics
    describe_counter!("cache_hits_total", "Total cache hits, labeled by cache name.");
    describe_counter!("cache_miss_total", "Total cache misses, labeled by cache name.");
    describe_gauge!(
        "cache_occupied",
        "Whether the cache slot currently holds a client (0/1), labeled by cache name."
    );

    // Registry metrics
    describe_counter!(
        "registry_lookups_total",
        "Total chain registry lookups, labeled by source (memo, config, remote)."
    );
    describe_counter!(
        "registry_lookup_failures_total",
        "Total failed chain registry lookups, labeled by chain."
    );

    // Client construction metrics
    describe_counter!(
        "client_builds_total",
        "Total query client constructions, labeled by chain."
    );
    describe_counter!(
        "client_build_failures_total",
        "Total failed query client constructions, labeled by chain."
    );

    // Query metrics
    describe_counter!(
        "query_requests_total",
        "Total REST queries performed, labeled by method."
    );
    describe_histogram!(
        "query_request_latency_ms",
        "REST query latency in milliseconds, labeled by method."
    );

    // Transfer metrics
    describe_counter!(
        "tx_broadcasts_total",
        "Total transactions handed to the signing backend, labeled by result."
    );
}

// --- Helper functions to update metrics ---

pub fn increment_cache_hit(cache_name: &str) {
    counter!("cache_hits_total", 1, "cache" => cache_name.to_string());
}

pub fn increment_cache_miss(cache_name: &str) {
    counter!("cache_miss_total", 1, "cache" => cache_name.to_string());
}

pub fn set_cache_occupied(cache_name: &str, occupied: bool) {
    gauge!("cache_occupied", if occupied { 1.0 } else { 0.0 }, "cache" => cache_name.to_string());
}

pub fn record_registry_lookup(source: &'static str) {
    counter!("registry_lookups_total", 1, "source" => source);
}

pub fn increment_registry_failure(chain: &str) {
    counter!("registry_lookup_failures_total", 1, "chain" => chain.to_string());
}

pub fn increment_client_build(chain: &str) {
    counter!("client_builds_total", 1, "chain" => chain.to_string());
}

pub fn increment_client_build_failure(chain: &str) {
    counter!("client_build_failures_total", 1, "chain" => chain.to_string());
}

pub fn record_query_request(method: &'static str, duration: std::time::Duration) {
    counter!("query_requests_total", 1, "method" => method);
    histogram!("query_request_latency_ms", duration.as_millis() as f64, "method" => method);
}

pub fn increment_tx_broadcast(result: &'static str) {
    counter!("tx_broadcasts_total", 1, "result" => result);
}
