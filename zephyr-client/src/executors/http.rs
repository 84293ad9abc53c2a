//! JSON-RPC chain executor.
//!
//! Talks to a Solana-compatible JSON-RPC endpoint over HTTP for balances,
//! block references, account lookups, submission and confirmation.
//!
//! # Feature Flags
//!
//! This module requires the `http-executor` feature flag for actual HTTP
//! requests. Without it, all requests return a `NetworkFailure` naming the
//! missing feature.
//!
//! ```toml
//! [dependencies]
//! zephyr-client = { version = "0.1", features = ["http-executor"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use zephyr_client::config::ClientConfig;
//! use zephyr_client::executors::HttpRpcClient;
//!
//! let config = ClientConfig::devnet(mint, receiver);
//! let rpc = HttpRpcClient::new(&config)?;
//! let balance = rpc.balance(&account, &AssetKind::Native).await?;
//! ```
//!
//! Note: this executor is transport only. It cannot create or sign
//! transactions; pair it with a wallet provider and broadcast the signed
//! bytes via `submit_transaction`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
#[cfg(feature = "http-executor")]
use std::time::Duration;

use crate::config::ClientConfig;
use crate::provider::SignedTransaction;
use crate::rpc::{Balance, ChainRpc, ConfirmationStatus};
use crate::transaction::BlockReference;
use crate::{Address, AssetKind, ClientError, Result, TransactionId};

/// Decimal precision of the native currency (lamports per unit).
pub const NATIVE_DECIMALS: u8 = 9;

/// HTTP executor for a JSON-RPC chain endpoint.
pub struct HttpRpcClient {
    endpoint: String,
    #[cfg(feature = "http-executor")]
    client: reqwest::Client,
}

impl HttpRpcClient {
    /// Create an executor from the client configuration.
    #[cfg(feature = "http-executor")]
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::NetworkFailure(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: config.rpc_endpoint.clone(),
            client,
        })
    }

    /// Create an executor from the client configuration (stub when the
    /// feature is disabled).
    #[cfg(not(feature = "http-executor"))]
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            endpoint: config.rpc_endpoint.clone(),
        })
    }

    /// The endpoint this executor talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue a JSON-RPC call and unwrap the envelope.
    #[cfg(feature = "http-executor")]
    async fn call<T: for<'de> Deserialize<'de>>(&self, method: &str, params: Value) -> Result<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::NetworkFailure(format!(
                "rpc request failed ({}): {}",
                status.as_u16(),
                text
            )));
        }

        let envelope: RpcEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::NetworkFailure(format!("failed to parse rpc response: {e}")))?;
        envelope.into_result(method)
    }

    /// Issue a JSON-RPC call (stub when the feature is disabled).
    #[cfg(not(feature = "http-executor"))]
    async fn call<T: for<'de> Deserialize<'de>>(&self, _method: &str, _params: Value) -> Result<T> {
        Err(ClientError::NetworkFailure(
            "HTTP executor not compiled - enable the 'http-executor' feature".to_string(),
        ))
    }

    #[cfg(feature = "http-executor")]
    fn map_reqwest_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::NetworkFailure(format!("rpc request to {} timed out", self.endpoint))
        } else if e.is_connect() {
            ClientError::NetworkFailure(format!("connection to {} failed: {e}", self.endpoint))
        } else {
            ClientError::NetworkFailure(format!("rpc request failed: {e}"))
        }
    }

    /// First existing token account of `owner` for `mint`, if any.
    async fn existing_token_account(
        &self,
        owner: &Address,
        mint: &Address,
    ) -> Result<Option<TokenAccountEntry>> {
        let response: ContextValue<Vec<TokenAccountEntry>> = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    owner.as_str(),
                    { "mint": mint.as_str() },
                    { "encoding": "jsonParsed" },
                ]),
            )
            .await?;
        Ok(response.value.into_iter().next())
    }
}

#[async_trait]
impl ChainRpc for HttpRpcClient {
    async fn balance(&self, account: &Address, asset: &AssetKind) -> Result<Balance> {
        match asset {
            AssetKind::Native => {
                let response: ContextValue<u64> =
                    self.call("getBalance", json!([account.as_str()])).await?;
                Ok(Balance {
                    amount: response.value,
                    decimals: NATIVE_DECIMALS,
                })
            }
            AssetKind::Token { mint } => {
                match self.existing_token_account(account, mint).await? {
                    Some(entry) => entry.balance(),
                    None => {
                        // No holding account yet: a zero balance at the
                        // mint's precision, not an error.
                        let supply: ContextValue<TokenAmount> =
                            self.call("getTokenSupply", json!([mint.as_str()])).await?;
                        Ok(Balance {
                            amount: 0,
                            decimals: supply.value.decimals,
                        })
                    }
                }
            }
        }
    }

    async fn recent_block_reference(&self) -> Result<BlockReference> {
        let response: ContextValue<BlockhashValue> = self
            .call("getLatestBlockhash", json!([{ "commitment": "confirmed" }]))
            .await?;
        Ok(BlockReference::new(response.value.blockhash))
    }

    async fn account_exists(&self, address: &Address) -> Result<bool> {
        let response: ContextValue<Option<Value>> = self
            .call(
                "getAccountInfo",
                json!([address.as_str(), { "encoding": "base64" }]),
            )
            .await?;
        Ok(response.value.is_some())
    }

    async fn token_account_address(&self, owner: &Address, mint: &Address) -> Result<Address> {
        if let Some(entry) = self.existing_token_account(owner, mint).await? {
            return Ok(Address::new(entry.pubkey));
        }
        derive_token_account(owner, mint)
    }

    async fn submit_transaction(&self, tx: &SignedTransaction) -> Result<TransactionId> {
        let payload = encode_transaction(tx)?;
        let signature: String = self
            .call(
                "sendTransaction",
                json!([payload, { "encoding": "base64" }]),
            )
            .await?;
        Ok(TransactionId::new(signature))
    }

    async fn confirmation_status(&self, id: &TransactionId) -> Result<ConfirmationStatus> {
        let response: ContextValue<Vec<Option<SignatureStatusView>>> = self
            .call(
                "getSignatureStatuses",
                json!([[id.as_str()], { "searchTransactionHistory": true }]),
            )
            .await?;
        let entry = response.value.into_iter().next().flatten();
        Ok(map_signature_status(entry))
    }
}

/// Derive the associated token account of `owner` for `mint`.
#[cfg(feature = "http-executor")]
fn derive_token_account(owner: &Address, mint: &Address) -> Result<Address> {
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    use crate::transaction::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID};

    let owner_key = Pubkey::from_str(owner.as_str())
        .map_err(|e| ClientError::misconfigured("owner address", e.to_string()))?;
    let mint_key = Pubkey::from_str(mint.as_str())
        .map_err(|e| ClientError::misconfigured("token mint", e.to_string()))?;
    let token_program = Pubkey::from_str(TOKEN_PROGRAM_ID)
        .map_err(|e| ClientError::misconfigured("token program", e.to_string()))?;
    let ata_program = Pubkey::from_str(ASSOCIATED_TOKEN_PROGRAM_ID)
        .map_err(|e| ClientError::misconfigured("token account program", e.to_string()))?;

    let (address, _bump) = Pubkey::find_program_address(
        &[owner_key.as_ref(), token_program.as_ref(), mint_key.as_ref()],
        &ata_program,
    );
    Ok(Address::new(address.to_string()))
}

/// Derive the associated token account (stub when the feature is disabled).
#[cfg(not(feature = "http-executor"))]
fn derive_token_account(_owner: &Address, _mint: &Address) -> Result<Address> {
    Err(ClientError::NetworkFailure(
        "HTTP executor not compiled - enable the 'http-executor' feature".to_string(),
    ))
}

/// Base64 payload for `sendTransaction`.
#[cfg(feature = "http-executor")]
fn encode_transaction(tx: &SignedTransaction) -> Result<String> {
    use base64::Engine;
    Ok(base64::engine::general_purpose::STANDARD.encode(&tx.bytes))
}

/// Base64 payload for `sendTransaction` (stub when the feature is disabled).
#[cfg(not(feature = "http-executor"))]
fn encode_transaction(_tx: &SignedTransaction) -> Result<String> {
    Err(ClientError::NetworkFailure(
        "HTTP executor not compiled - enable the 'http-executor' feature".to_string(),
    ))
}

fn map_signature_status(entry: Option<SignatureStatusView>) -> ConfirmationStatus {
    match entry {
        None => ConfirmationStatus::Pending,
        Some(status) => {
            if let Some(err) = status.err {
                return ConfirmationStatus::Failed(err.to_string());
            }
            match status.confirmation_status.as_deref() {
                Some("confirmed") | Some("finalized") => ConfirmationStatus::Confirmed,
                _ => ConfirmationStatus::Pending,
            }
        }
    }
}

// ============================================================================
// API Response Types
// ============================================================================

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

impl<T> RpcEnvelope<T> {
    fn into_result(self, method: &str) -> Result<T> {
        if let Some(err) = self.error {
            return Err(ClientError::NetworkFailure(format!(
                "{method}: rpc error {}: {}",
                err.code, err.message
            )));
        }
        self.result.ok_or_else(|| {
            ClientError::NetworkFailure(format!("{method}: response had neither result nor error"))
        })
    }
}

/// JSON-RPC error body.
#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Wrapper most query responses use: `{ "context": ..., "value": ... }`.
#[derive(Debug, Deserialize)]
struct ContextValue<T> {
    value: T,
}

/// One entry of a `getTokenAccountsByOwner` response.
#[derive(Debug, Deserialize)]
struct TokenAccountEntry {
    pubkey: String,
    account: ParsedAccount,
}

impl TokenAccountEntry {
    fn balance(&self) -> Result<Balance> {
        let token_amount = &self.account.data.parsed.info.token_amount;
        let amount = token_amount.amount.parse::<u64>().map_err(|e| {
            ClientError::NetworkFailure(format!("unparseable token amount: {e}"))
        })?;
        Ok(Balance {
            amount,
            decimals: token_amount.decimals,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ParsedAccount {
    data: ParsedData,
}

#[derive(Debug, Deserialize)]
struct ParsedData {
    parsed: ParsedInfo,
}

#[derive(Debug, Deserialize)]
struct ParsedInfo {
    info: TokenAccountInfo,
}

#[derive(Debug, Deserialize)]
struct TokenAccountInfo {
    #[serde(rename = "tokenAmount")]
    token_amount: TokenAmount,
}

/// A token amount with its precision.
#[derive(Debug, Deserialize)]
struct TokenAmount {
    amount: String,
    decimals: u8,
}

#[derive(Debug, Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

/// One entry of a `getSignatureStatuses` response.
#[derive(Debug, Deserialize)]
struct SignatureStatusView {
    #[serde(rename = "confirmationStatus")]
    confirmation_status: Option<String>,
    err: Option<Value>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig::devnet(
            "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "4GuJSQQxpAJkQ4sRbU3y9Q9xrsQXYCJFtRHUmqxErcb7",
        )
    }

    #[test]
    fn test_executor_keeps_endpoint() {
        let rpc = HttpRpcClient::new(&test_config()).unwrap();
        assert!(rpc.endpoint().contains("devnet"));
    }

    #[test]
    fn test_envelope_unwrapping() {
        let ok: RpcEnvelope<u64> = serde_json::from_str(r#"{"result": 7}"#).unwrap();
        assert_eq!(ok.into_result("getBalance").unwrap(), 7);

        let err: RpcEnvelope<u64> =
            serde_json::from_str(r#"{"error": {"code": -32602, "message": "invalid params"}}"#)
                .unwrap();
        let failure = err.into_result("getBalance").unwrap_err();
        assert!(failure.to_string().contains("-32602"));

        let empty: RpcEnvelope<u64> = serde_json::from_str("{}").unwrap();
        assert!(empty.into_result("getBalance").is_err());
    }

    #[test]
    fn test_token_account_entry_parsing() {
        let json = r#"{
            "pubkey": "7UX2i7SucgLMQcfZ75s3VXmZZY4YRUyJN9X1RgfMoDUi",
            "account": {
                "data": {
                    "parsed": {
                        "info": {
                            "tokenAmount": {"amount": "123456", "decimals": 6, "uiAmountString": "0.123456"}
                        }
                    }
                }
            }
        }"#;
        let entry: TokenAccountEntry = serde_json::from_str(json).unwrap();
        let balance = entry.balance().unwrap();
        assert_eq!(balance.amount, 123_456);
        assert_eq!(balance.decimals, 6);
    }

    #[test]
    fn test_signature_status_mapping() {
        assert_eq!(map_signature_status(None), ConfirmationStatus::Pending);

        let processed: SignatureStatusView =
            serde_json::from_str(r#"{"confirmationStatus": "processed", "err": null}"#).unwrap();
        assert_eq!(
            map_signature_status(Some(processed)),
            ConfirmationStatus::Pending
        );

        let confirmed: SignatureStatusView =
            serde_json::from_str(r#"{"confirmationStatus": "confirmed", "err": null}"#).unwrap();
        assert_eq!(
            map_signature_status(Some(confirmed)),
            ConfirmationStatus::Confirmed
        );

        let finalized: SignatureStatusView =
            serde_json::from_str(r#"{"confirmationStatus": "finalized", "err": null}"#).unwrap();
        assert_eq!(
            map_signature_status(Some(finalized)),
            ConfirmationStatus::Confirmed
        );

        let failed: SignatureStatusView = serde_json::from_str(
            r#"{"confirmationStatus": "confirmed", "err": {"InstructionError": [0, "Custom"]}}"#,
        )
        .unwrap();
        assert!(matches!(
            map_signature_status(Some(failed)),
            ConfirmationStatus::Failed(_)
        ));
    }
}
