//! Zephyr payment client library.
//!
//! This crate intentionally stays free of key material and network plumbing:
//! signing is delegated to a [`provider::WalletProvider`] and chain access to
//! a [`rpc::ChainRpc`], both injected as trait objects.
//!
//! # Features
//!
//! - **Session lifecycle**: connect a wallet provider, including the mobile
//!   deep-link handshake and conservative resume-on-load
//! - **x401 authentication**: a signed, timestamped assertion binding the
//!   connected account to this client instance
//! - **x402 payments**: balance validation, transfer construction (native or
//!   token, with token-account creation when needed), submission and
//!   confirmation tracking
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use zephyr_client::{config::ClientConfig, payment::{PaymentFlow, PaymentRequest}};
//! use zephyr_client::session::SessionManager;
//!
//! let session = Arc::new(SessionManager::new(provider, rpc, status, config)?);
//! session.connect().await?;
//!
//! let flow = PaymentFlow::new(session.clone());
//! let outcome = flow.pay(&PaymentRequest::token(mint, "0.01", receiver)).await?;
//! println!("paid: {:?}", outcome.transaction_id);
//! ```

pub mod amount;
pub mod auth;
pub mod config;
pub mod deeplink;
pub mod errors;
pub mod executors;
pub mod payment;
pub mod poll;
pub mod provider;
pub mod rpc;
pub mod session;
pub mod status;
pub mod transaction;

pub use auth::{AuthAssertion, AuthFlow};
pub use config::ClientConfig;
pub use errors::ClientError;
pub use payment::{PaymentFlow, PaymentOutcome, PaymentRequest};
pub use provider::WalletProvider;
pub use rpc::ChainRpc;
pub use session::{ConnectOutcome, SessionManager, SessionState};
pub use status::StatusSink;

/// Common result alias for Zephyr client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Opaque chain address (account, mint or program identifier).
///
/// The client never interprets address bytes; it only passes them between
/// the wallet provider and the chain RPC endpoint.
///
/// # Example
///
/// ```
/// use zephyr_client::Address;
///
/// let addr: Address = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr".into();
/// assert!(addr.as_str().starts_with("Memo"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create a new address from a string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the address is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this is the all-ones placeholder that unconfigured
    /// deployments ship with instead of a real address.
    pub fn is_placeholder(&self) -> bool {
        self.0 == transaction::PLACEHOLDER_ADDRESS
    }

    /// Abbreviated form for status lines (`4GuJ..rcb7`).
    pub fn short(&self) -> String {
        if self.0.len() <= 10 {
            return self.0.clone();
        }
        format!("{}..{}", &self.0[..4], &self.0[self.0.len() - 4..])
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a submitted transaction.
///
/// Recorded as soon as the network accepts a submission, before
/// confirmation, so the reference survives a confirmation failure.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionId(pub String);

impl TransactionId {
    /// Create a new transaction id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The asset a payment moves: the chain's native currency or a token
/// identified by its mint address.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AssetKind {
    /// Native currency of the chain.
    Native,
    /// Tokenized asset issued by `mint`.
    Token {
        /// Mint address identifying the token.
        mint: Address,
    },
}

impl AssetKind {
    /// Create the token variant.
    pub fn token(mint: impl Into<Address>) -> Self {
        Self::Token { mint: mint.into() }
    }

    /// Short label used in status and error text.
    pub fn label(&self) -> String {
        match self {
            Self::Native => "native".to_string(),
            Self::Token { mint } => format!("token {}", mint.short()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_short_form() {
        let addr = Address::new("4GuJSQQxpAJkQ4sRbU3y9Q9xrsQXYCJFtRHUmqxErcb7");
        assert_eq!(addr.short(), "4GuJ..rcb7");

        let tiny = Address::new("abc");
        assert_eq!(tiny.short(), "abc");
    }

    #[test]
    fn test_placeholder_detection() {
        let placeholder = Address::new(transaction::PLACEHOLDER_ADDRESS);
        assert!(placeholder.is_placeholder());
        assert!(!Address::new("4GuJSQQxpAJkQ4sRbU3y9Q9xrsQXYCJFtRHUmqxErcb7").is_placeholder());
    }

    #[test]
    fn test_asset_labels() {
        assert_eq!(AssetKind::Native.label(), "native");
        let token = AssetKind::token("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        assert!(token.label().starts_with("token EPjF"));
    }
}
