//! CLI subcommands.

pub mod auth;
pub mod connect;
pub mod pay;

use std::sync::Arc;

use anyhow::{Context, Result};

use zephyr_client::config::ClientConfig;
use zephyr_client::executors::HttpRpcClient;
use zephyr_client::rpc::ChainRpc;
use zephyr_client::session::SessionManager;
use zephyr_client::status::StatusSink;

use crate::ledger::OfflineLedger;
use crate::ui::ConsoleStatusSink;
use crate::wallet::SoftwareWallet;

// The original deployment's example values: USDC devnet mint and a demo
// receiver. Override via ZEPHYR_* environment variables.
const DEMO_TOKEN_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
const DEMO_RECEIVER: &str = "4GuJSQQxpAJkQ4sRbU3y9Q9xrsQXYCJFtRHUmqxErcb7";

/// Build a session over the demo software wallet.
pub fn build_session(offline: bool) -> Result<(Arc<SessionManager>, ClientConfig)> {
    let config = ClientConfig::from_env()
        .unwrap_or_else(|_| ClientConfig::devnet(DEMO_TOKEN_MINT, DEMO_RECEIVER));
    tracing::debug!(endpoint = %config.rpc_endpoint, offline, "building demo session");

    let provider = Arc::new(SoftwareWallet::from_env_or_generate()?);
    let status: Arc<dyn StatusSink> = Arc::new(ConsoleStatusSink);

    let rpc: Arc<dyn ChainRpc> = if offline {
        Arc::new(OfflineLedger::funded(provider.address(), &config))
    } else {
        Arc::new(HttpRpcClient::new(&config).context("failed to build the RPC executor")?)
    };

    let session = SessionManager::new(provider, rpc, status, config.clone())
        .context("failed to construct the session")?;
    Ok((Arc::new(session), config))
}
