//! Wallet provider capability.
//!
//! A provider is any agent holding private keys that can approve account
//! access and sign on the user's behalf - a browser extension, a mobile
//! wallet app, or a local software key in tests and demos. The client never
//! sees key material; it only receives signatures.

use async_trait::async_trait;

use crate::transaction::TransactionDraft;
use crate::{Address, Result};

/// Capabilities a provider exposes, inspected once when the session is
/// constructed rather than re-probed on every call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Can request account access.
    pub connect: bool,
    /// Can sign an arbitrary message directly.
    pub sign_message: bool,
    /// Can sign a built transaction draft.
    pub sign_transaction: bool,
}

impl ProviderCapabilities {
    /// A provider that supports everything.
    pub fn complete() -> Self {
        Self {
            connect: true,
            sign_message: true,
            sign_transaction: true,
        }
    }

    /// Whether a session can be driven at all: account access plus at
    /// least one signing path.
    pub fn supports_session(&self) -> bool {
        self.connect && (self.sign_message || self.sign_transaction)
    }
}

/// A message signed by the provider.
#[derive(Clone, Debug)]
pub struct SignedMessage {
    /// Account the provider attributed the signature to.
    pub signer: Address,
    /// Opaque signature bytes.
    pub signature: Vec<u8>,
}

/// A transaction signed by the provider, ready for submission.
///
/// The byte encoding is the provider's concern; the client treats it as an
/// opaque payload and only inspects the signer set.
#[derive(Clone, Debug)]
pub struct SignedTransaction {
    /// Wire bytes to broadcast.
    pub bytes: Vec<u8>,
    /// Accounts whose signatures the transaction carries.
    pub signers: Vec<Address>,
}

/// Core wallet capability trait.
///
/// Errors follow the client taxonomy: a user closing the approval prompt is
/// `UserRejected`, an unreachable provider backend is `NetworkFailure`.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether the provider is reachable right now.
    fn is_available(&self) -> bool;

    /// Capabilities this provider exposes.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Whether the provider already holds a user-approved session for this
    /// origin, so a silent reconnect will not prompt. Advisory.
    fn has_trusted_session(&self) -> bool {
        false
    }

    /// Request account access. May prompt the user.
    async fn connect(&self) -> Result<Address>;

    /// Sign an arbitrary message.
    async fn sign_message(&self, message: &[u8]) -> Result<SignedMessage>;

    /// Sign a fully built transaction draft. This is a suspension point
    /// with no timeout; the user may cancel in the wallet UI.
    async fn sign_transaction(&self, draft: &TransactionDraft) -> Result<SignedTransaction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_combinations() {
        assert!(ProviderCapabilities::complete().supports_session());

        let tx_only = ProviderCapabilities {
            connect: true,
            sign_message: false,
            sign_transaction: true,
        };
        assert!(tx_only.supports_session());

        let no_signing = ProviderCapabilities {
            connect: true,
            sign_message: false,
            sign_transaction: false,
        };
        assert!(!no_signing.supports_session());

        let no_connect = ProviderCapabilities {
            connect: false,
            sign_message: true,
            sign_transaction: true,
        };
        assert!(!no_connect.supports_session());
    }
}
