//! Integration tests for configuration loading
//!
//! Tests cover:
//! - Defaults for omitted sections
//! - Per-chain overrides from the config file
//! - Endpoint URL normalization
//! - Environment variable overrides

use interchain_query_sdk::settings::Settings;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp config");
    file
}

/// Test that an empty config file falls back to documented defaults
#[test]
fn test_empty_file_yields_defaults() {
    let file = write_config("");
    let settings = Settings::from_file(file.path()).unwrap();

    assert_eq!(settings.registry.retry_attempts, 3);
    assert_eq!(settings.registry.retry_base_ms, 200);
    assert_eq!(settings.registry.request_timeout_ms, 5000);
    assert_eq!(settings.client.request_timeout_ms, 10_000);
    assert!(settings.client.verify_chain_id);
    assert_eq!(settings.client.max_endpoint_attempts, 4);
    assert_eq!(settings.tx.default_send_amount, "1000");
    assert_eq!(settings.tx.fee_amount, "2000");
    assert_eq!(settings.tx.gas_limit, 86_364);
    assert_eq!(settings.log.level, "info");
}

/// Test that partial sections keep defaults for omitted fields
#[test]
fn test_partial_sections_keep_remaining_defaults() {
    let file = write_config(
        r#"
[registry]
retry_attempts = 5

[client]
verify_chain_id = false
"#,
    );
    let settings = Settings::from_file(file.path()).unwrap();

    assert_eq!(settings.registry.retry_attempts, 5);
    assert_eq!(settings.registry.retry_base_ms, 200, "Omitted field should keep its default");
    assert!(!settings.client.verify_chain_id);
    assert_eq!(settings.client.request_timeout_ms, 10_000);
}

/// Test that per-chain sections load endpoints and pinned chain ids
#[test]
fn test_reads_chain_overrides() {
    let file = write_config(
        r#"
[chains.localnet]
chain_id = "localnet-1"
rest = ["http://localhost:1317"]
rpc = ["http://localhost:26657"]

[chains.pinned]
chain_id = "pinned-7"
"#,
    );
    let settings = Settings::from_file(file.path()).unwrap();

    let localnet = settings.chains.get("localnet").expect("localnet should load");
    assert_eq!(localnet.chain_id.as_deref(), Some("localnet-1"));
    assert_eq!(localnet.rest, vec!["http://localhost:1317"]);
    assert_eq!(localnet.rpc, vec!["http://localhost:26657"]);

    // A bare chain_id pins the expected network without endpoints.
    let pinned = settings.chains.get("pinned").expect("pinned should load");
    assert_eq!(pinned.chain_id.as_deref(), Some("pinned-7"));
    assert!(pinned.rest.is_empty());
}

/// Test that endpoint URLs are trimmed and lose trailing slashes
#[test]
fn test_endpoint_urls_are_normalized() {
    let file = write_config(
        r#"
[registry]
base_url = "https://registry.example/"

[chains.localnet]
rest = ["  http://localhost:1317/  ", "", "http://other:1317"]
"#,
    );
    let settings = Settings::from_file(file.path()).unwrap();

    let localnet = settings.chains.get("localnet").unwrap();
    assert_eq!(
        localnet.rest,
        vec!["http://localhost:1317", "http://other:1317"],
        "URLs should be trimmed and empty entries dropped"
    );
}

/// Test that environment variables override file configuration
#[test]
fn test_environment_overrides_apply() {
    let file = write_config(
        r#"
[chains.envtestchain]
rest = ["http://stale:1317"]
"#,
    );

    std::env::set_var(
        "ICQ_CHAIN_ENDPOINTS",
        "envtestchain=http://fresh:1317/,envtestchain=http://fresh2:1317",
    );
    let settings = Settings::from_file(file.path()).unwrap();
    std::env::remove_var("ICQ_CHAIN_ENDPOINTS");

    let chain = settings.chains.get("envtestchain").unwrap();
    assert_eq!(
        chain.rest,
        vec!["http://fresh:1317", "http://fresh2:1317"],
        "Environment endpoints should replace the file's list"
    );
}
