//! # Balance Watcher Service
//!
//! Continuous service that polls bank balances for a set of chain/address
//! pairs using the interchain query SDK.
//!
//! ## Overview
//!
//! This service:
//! - Resolves REST endpoints per chain (configured overrides or the remote registry)
//! - Keeps one cached query client per watched chain
//! - Discards the cached client and resolved endpoints when a query fails
//! - Handles graceful shutdown on Ctrl+C
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin balance_watcher -- \
//!     --watch cosmoshub:cosmos1abc... \
//!     --watch osmosis:osmo1xyz... \
//!     --interval-seconds 30
//! ```
//!
//! Press Ctrl+C to stop gracefully.

use interchain_query_sdk::{
    bank::BankQuerier,
    client_factory::RegistryClientFactory,
    registry::ChainRegistry,
    settings::Settings,
};
use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration};

#[derive(Parser)]
#[command(name = "balance_watcher")]
#[command(about = "Polls bank balances for chain:address pairs", long_about = None)]
struct Cli {
    /// Watch target in `chain:address` form; repeat for multiple targets.
    #[arg(short, long = "watch", value_name = "CHAIN:ADDRESS", required = true)]
    watch: Vec<String>,

    /// Seconds between polling rounds.
    #[arg(short, long, default_value_t = 30)]
    interval_seconds: u64,

    /// Query a single denom instead of listing every balance.
    #[arg(short, long)]
    denom: Option<String>,
}

fn parse_watch_target(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((chain, address)) if !chain.is_empty() && !address.is_empty() => {
            Ok((chain.to_string(), address.to_string()))
        }
        _ => bail!("invalid watch target '{}', expected chain:address", raw),
    }
}

async fn poll_target(
    querier: &BankQuerier<RegistryClientFactory>,
    chain: &str,
    address: &str,
    denom: Option<&str>,
) -> Result<Vec<String>> {
    match denom {
        Some(denom) => {
            let coin = querier.balance(chain, address, denom).await?;
            Ok(coin.into_iter().map(|c| c.to_string()).collect())
        }
        None => {
            let coins = querier.all_balances(chain, address).await?;
            Ok(coins.into_iter().map(|c| c.to_string()).collect())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    println!("🚀 Starting Balance Watcher Service");
    println!("═══════════════════════════════════════════════════════════════════\n");

    // 1. Load settings
    let settings = Settings::new()?;
    println!("✅ Settings loaded");

    // 2. Initialize logging (RUST_LOG overrides the configured level)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log.level.as_str()),
    )
    .init();

    #[cfg(feature = "observability")]
    {
        use interchain_query_sdk::settings::LogFormat;

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log.level));
        match settings.log.format {
            LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
            LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        }

        metrics_exporter_prometheus::PrometheusBuilder::new().install()?;
        interchain_query_sdk::metrics::describe_metrics();
        println!("✅ Prometheus exporter installed");
    }
    println!("✅ Logging initialized");

    // 3. Parse watch targets
    let mut targets: Vec<(String, String)> = Vec::new();
    for raw in &cli.watch {
        targets.push(parse_watch_target(raw)?);
    }
    println!("✅ Watching {} target(s)", targets.len());

    // 4. Create the shared chain registry
    let registry = Arc::new(ChainRegistry::from_settings(&settings)?);
    println!("✅ Chain registry created");

    // 5. One querier per chain. Each cache holds a single client, so chains
    //    polled in the same round each get their own instance.
    let mut queriers: HashMap<String, BankQuerier<RegistryClientFactory>> = HashMap::new();
    for (chain, _) in &targets {
        queriers.entry(chain.clone()).or_insert_with(|| {
            BankQuerier::new(RegistryClientFactory::new(
                registry.clone(),
                settings.client.clone(),
            ))
        });
    }
    println!("✅ Query clients prepared ({} chains)", queriers.len());

    let poll_interval = cli.interval_seconds;
    println!("\n📊 Service Configuration:");
    println!("   Poll interval: {} seconds", poll_interval);
    if let Some(denom) = &cli.denom {
        println!("   Denom filter: {}", denom);
    }
    println!("\n🔄 Starting polling task...\n");

    // 6. Spawn polling task
    let denom = cli.denom.clone();
    let registry_for_task = registry.clone();
    let watch_handle = tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(poll_interval));
        loop {
            interval.tick().await;
            for (chain, address) in &targets {
                let querier = match queriers.get(chain) {
                    Some(querier) => querier,
                    None => continue,
                };
                match poll_target(querier, chain, address, denom.as_deref()).await {
                    Ok(lines) => {
                        println!("{} {}", chain.bold().cyan(), address.dimmed());
                        if lines.is_empty() {
                            println!("   {}", "no balances".yellow());
                        }
                        for line in lines {
                            println!("   {}", line.green());
                        }
                    }
                    Err(e) => {
                        eprintln!("❌ {} query failed: {:#}", chain, e);
                        // Stale endpoints are the usual culprit; resolve and
                        // reconnect from scratch on the next tick.
                        registry_for_task.forget(chain);
                        querier.cache().invalidate();
                    }
                }
            }
        }
    });

    // 7. Wait for shutdown signal
    println!("💡 Service running:");
    println!("   - Balances polled every {} seconds", poll_interval);
    println!("\nPress Ctrl+C to stop gracefully...\n");

    signal::ctrl_c().await?;
    println!("\n🛑 Shutdown signal received, stopping tasks...");

    watch_handle.abort();

    println!("✅ Shutdown complete");

    Ok(())
}
