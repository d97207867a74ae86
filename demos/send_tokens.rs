//! # Token Send Composition Example
//!
//! This example composes a bank send and broadcasts it through a dry-run
//! signer that prints what would be signed. Nothing touches a live chain,
//! so the addresses can be anything.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example send_tokens -- cosmos1sender... cosmos1recipient...
//!
//! # Custom denom and amount:
//! cargo run --example send_tokens -- cosmos1sender... cosmos1recipient... uosmo 2500
//! ```

use interchain_query_sdk::{
    query_client::ClientError,
    settings::Settings,
    tx::{self, Fee, MsgSend, SendRequest, SigningClient, TxResponse},
    types::Coin,
};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::env;

/// Signer that prints the transaction instead of broadcasting it.
struct DryRunSigner;

#[async_trait]
impl SigningClient for DryRunSigner {
    async fn sign_and_broadcast(
        &self,
        sender: &str,
        msgs: &[MsgSend],
        fee: &Fee,
    ) -> Result<TxResponse, ClientError> {
        println!("\n📝 Would sign as {}:", sender);
        for msg in msgs {
            let rendered = serde_json::to_string_pretty(msg)
                .map_err(|e| ClientError::Signing(e.to_string()))?;
            println!("{}", rendered);
        }
        println!("💰 Fee: {} (gas {})", fee.amount[0], fee.gas);

        Ok(TxResponse {
            height: 0,
            txhash: "DRYRUN0000000000000000000000000000000000000000000000000000000000".to_string(),
            code: 0,
            raw_log: "[]".to_string(),
            gas_wanted: fee.gas.parse().unwrap_or(0),
            gas_used: 0,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 4 {
        bail!("usage: send_tokens <from_address> <to_address> [<denom> <amount>]");
    }

    println!("🚀 Composing a bank send...");

    // 1. Load settings for fee and gas defaults
    let settings = Settings::new()?;
    println!("✅ Settings loaded");

    // 2. Build the transfer request
    let denom = args.get(2).cloned().unwrap_or_else(|| "uatom".to_string());
    let amount = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| settings.tx.default_send_amount.clone());

    let request = SendRequest {
        from_address: args[0].clone(),
        to_address: args[1].clone(),
        amount: Coin::new(denom, amount),
    };
    println!("✅ Sending {} from {} to {}", request.amount, request.from_address, request.to_address);

    // 3. Show what compose_send produces before broadcasting
    let (msg, fee) = tx::compose_send(&request, &settings.tx);
    println!("✅ Composed {} ({} -> {})", MsgSend::TYPE_URL, msg.from_address, msg.to_address);
    println!("   Fee: {} (gas {})", fee.amount[0], fee.gas);

    // 4. Broadcast through the dry-run signer
    let response = tx::send_tokens(&DryRunSigner, &request, &settings.tx).await?;
    println!("\n🎉 Broadcast result:");
    println!("   txhash: {}", response.txhash);
    println!("   code:   {} (success: {})", response.code, response.is_success());

    Ok(())
}
