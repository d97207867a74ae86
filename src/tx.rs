//! Bank transfer composition.
//!
//! Transfers are composed as proto-JSON messages and handed to a
//! [`SigningClient`] implementation; this library never holds keys itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::metrics;
use crate::query_client::ClientError;
use crate::settings::TxSettings;
use crate::types::Coin;

/// Bank send message in the proto-JSON shape signing backends understand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Vec<Coin>,
}

impl MsgSend {
    pub const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSend";
}

/// Fixed fee attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

/// A transfer the caller wants broadcast.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub from_address: String,
    pub to_address: String,
    pub amount: Coin,
}

/// What the chain reported after broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub height: u64,
    pub txhash: String,
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub gas_wanted: u64,
    #[serde(default)]
    pub gas_used: u64,
}

impl TxResponse {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Signing backend seam. Implementations wrap a wallet or remote signer.
#[async_trait]
pub trait SigningClient: Send + Sync {
    async fn sign_and_broadcast(
        &self,
        sender: &str,
        msgs: &[MsgSend],
        fee: &Fee,
    ) -> Result<TxResponse, ClientError>;
}

/// Builds the message and fee for a transfer. The fee is paid in the sent
/// denom using the configured fee amount and gas limit.
pub fn compose_send(request: &SendRequest, tx_settings: &TxSettings) -> (MsgSend, Fee) {
    let msg = MsgSend {
        from_address: request.from_address.clone(),
        to_address: request.to_address.clone(),
        amount: vec![request.amount.clone()],
    };
    let fee = Fee {
        amount: vec![Coin::new(
            request.amount.denom.clone(),
            tx_settings.fee_amount.clone(),
        )],
        gas: tx_settings.gas_limit.to_string(),
    };
    (msg, fee)
}

/// Composes and broadcasts a transfer through the signing backend.
pub async fn send_tokens<S>(
    signer: &S,
    request: &SendRequest,
    tx_settings: &TxSettings,
) -> Result<TxResponse, ClientError>
where
    S: SigningClient + ?Sized,
{
    let (msg, fee) = compose_send(request, tx_settings);
    let result = signer
        .sign_and_broadcast(&request.from_address, std::slice::from_ref(&msg), &fee)
        .await;
    match &result {
        Ok(response) if response.is_success() => metrics::increment_tx_broadcast("ok"),
        Ok(_) => metrics::increment_tx_broadcast("failed"),
        Err(_) => metrics::increment_tx_broadcast("error"),
    }
    result
}
