//! # Basic Bank Query Example
//!
//! This example demonstrates the cached query client lifecycle:
//! - Endpoint resolution (configured overrides or the remote registry)
//! - Client reuse across repeated queries to the same chain
//! - Explicit invalidation and rebuild
//! - Switching chains through the same querier (the cache holds one client)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example basic_usage -- cosmoshub cosmos1abc...
//!
//! # With a second chain to demonstrate the client swap:
//! cargo run --example basic_usage -- cosmoshub cosmos1abc... osmosis osmo1xyz...
//! ```

use interchain_query_sdk::{
    bank::BankQuerier,
    client_factory::RegistryClientFactory,
    registry::ChainRegistry,
    settings::Settings,
};
use anyhow::{bail, Result};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 2 && args.len() != 4 {
        bail!("usage: basic_usage <chain> <address> [<chain2> <address2>]");
    }
    let (chain, address) = (&args[0], &args[1]);

    println!("🚀 Initializing interchain query SDK...");

    // 1. Load settings from config file or environment
    let settings = Settings::new()?;
    println!("✅ Settings loaded");

    // 2. Create the chain registry
    let registry = Arc::new(ChainRegistry::from_settings(&settings)?);
    println!("✅ Chain registry created");

    // 3. Create a bank querier with a registry-backed client factory
    let querier = BankQuerier::new(RegistryClientFactory::new(
        registry.clone(),
        settings.client.clone(),
    ));
    println!("✅ Bank querier created");

    // 4. First query builds a client for the chain
    println!("\n🔍 Querying balances for {} on {}...", address, chain);
    let balances = querier.all_balances(chain, address).await?;
    println!("✅ {} balance(s):", balances.len());
    for coin in &balances {
        println!("   {}", coin);
    }
    println!("   Cached client key: {:?}", querier.cache().cached_key());

    // 5. Second query reuses the cached client, no endpoint probing
    let balances = querier.all_balances(chain, address).await?;
    println!("✅ Repeat query served from the cached client ({} balance(s))", balances.len());

    if args.len() == 4 {
        let (chain2, address2) = (&args[2], &args[3]);

        // 6. A different chain swaps the cached client for a new one
        println!("\n🔍 Switching to {}...", chain2);
        let balances = querier.all_balances(chain2, address2).await?;
        println!("✅ {} balance(s) on {}:", balances.len(), chain2);
        for coin in &balances {
            println!("   {}", coin);
        }
        println!("   Cached client key: {:?}", querier.cache().cached_key());

        // 7. Going back rebuilds the first client from scratch
        let balances = querier.all_balances(chain, address).await?;
        println!("✅ Back on {} ({} balance(s)), client rebuilt", chain, balances.len());
    } else {
        // 6. Invalidate drops the client; the next query rebuilds it
        querier.cache().invalidate();
        println!("\n🗑️  Cache invalidated, key now {:?}", querier.cache().cached_key());

        let balances = querier.all_balances(chain, address).await?;
        println!("✅ Client rebuilt on demand ({} balance(s))", balances.len());
    }

    println!("\n🎉 Done!");
    println!("\nYou can now use:");
    println!("  - querier.balance(chain, address, denom).await?");
    println!("  - querier.display_balance(chain, address, &asset).await?");
    println!("  - registry.endpoints(chain).await?");

    Ok(())
}
