//! Static client configuration.
//!
//! Token identity, receiver address, RPC endpoint and the display-only
//! required-hold threshold are configuration, not runtime-negotiated state.

use serde::{Deserialize, Serialize};

use crate::deeplink::DeepLinkConfig;
use crate::{Address, ClientError, Result};

/// Public devnet RPC endpoint.
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

/// Public mainnet RPC endpoint.
pub const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Configuration for a Zephyr client instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Chain RPC endpoint URL.
    pub rpc_endpoint: String,

    /// Mint of the token used for x402 payments.
    pub token_mint: Address,

    /// Account receiving payments.
    pub receiver: Address,

    /// Token amount a holder is expected to keep. Display only, never
    /// enforced client-side.
    #[serde(default = "default_required_hold")]
    pub required_hold: String,

    /// RPC request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Mobile wallet handshake, when the host supports redirects.
    #[serde(default)]
    pub deep_link: Option<DeepLinkConfig>,
}

fn default_required_hold() -> String {
    "100000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ClientConfig {
    /// Create a configuration against an explicit endpoint.
    pub fn new(
        rpc_endpoint: impl Into<String>,
        token_mint: impl Into<Address>,
        receiver: impl Into<Address>,
    ) -> Self {
        Self {
            rpc_endpoint: rpc_endpoint.into(),
            token_mint: token_mint.into(),
            receiver: receiver.into(),
            required_hold: default_required_hold(),
            timeout_secs: default_timeout(),
            deep_link: None,
        }
    }

    /// Configuration against the public devnet endpoint.
    pub fn devnet(token_mint: impl Into<Address>, receiver: impl Into<Address>) -> Self {
        Self::new(DEVNET_RPC_URL, token_mint, receiver)
    }

    /// Configuration against the public mainnet endpoint.
    pub fn mainnet(token_mint: impl Into<Address>, receiver: impl Into<Address>) -> Self {
        Self::new(MAINNET_RPC_URL, token_mint, receiver)
    }

    /// Load from `ZEPHYR_*` environment variables. `ZEPHYR_TOKEN_MINT` and
    /// `ZEPHYR_RECEIVER` are required; the endpoint defaults to devnet.
    pub fn from_env() -> Result<Self> {
        let token_mint = std::env::var("ZEPHYR_TOKEN_MINT")
            .map_err(|_| ClientError::misconfigured("ZEPHYR_TOKEN_MINT", "not set"))?;
        let receiver = std::env::var("ZEPHYR_RECEIVER")
            .map_err(|_| ClientError::misconfigured("ZEPHYR_RECEIVER", "not set"))?;
        let rpc_endpoint =
            std::env::var("ZEPHYR_RPC_ENDPOINT").unwrap_or_else(|_| DEVNET_RPC_URL.to_string());

        let mut config = Self::new(rpc_endpoint, token_mint, receiver);
        if let Ok(hold) = std::env::var("ZEPHYR_REQUIRED_HOLD") {
            config.required_hold = hold;
        }
        Ok(config)
    }

    /// Attach a mobile deep-link handshake.
    pub fn with_deep_link(mut self, deep_link: DeepLinkConfig) -> Self {
        self.deep_link = Some(deep_link);
        self
    }

    /// Whether the token side of the configuration points at real
    /// addresses rather than placeholders.
    pub fn token_configured(&self) -> bool {
        !self.token_mint.is_empty()
            && !self.receiver.is_empty()
            && !self.token_mint.is_placeholder()
            && !self.receiver.is_placeholder()
    }

    /// Human-readable network label derived from the endpoint.
    pub fn network_label(&self) -> &'static str {
        if self.rpc_endpoint.contains("devnet") {
            "Devnet"
        } else if self.rpc_endpoint.contains("testnet") {
            "Testnet"
        } else {
            "Mainnet"
        }
    }
}
