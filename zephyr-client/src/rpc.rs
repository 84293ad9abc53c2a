//! Chain RPC capability.
//!
//! Everything the client needs from the network, consumed as a black box:
//! balances, block references, account existence, token-account resolution,
//! submission and confirmation. Implementations live in [`crate::executors`]
//! or in test mocks.

use async_trait::async_trait;

use crate::provider::SignedTransaction;
use crate::transaction::BlockReference;
use crate::{Address, AssetKind, Result, TransactionId};

/// A balance in base units together with the asset's decimal precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balance {
    /// Amount in the asset's smallest unit.
    pub amount: u64,
    /// Number of decimal places in the human representation.
    pub decimals: u8,
}

/// Confirmation state of a submitted transaction.
///
/// `Pending` means the network has not reached finality yet; it is not a
/// failure. `Failed` is the network reporting the transaction itself errored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Not yet finalized.
    Pending,
    /// Reached network finality.
    Confirmed,
    /// The network rejected or errored the transaction.
    Failed(String),
}

/// Chain access trait.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Fetch `account`'s balance for the given asset. For a token asset
    /// whose holding account does not exist, this is a zero balance, not an
    /// error.
    async fn balance(&self, account: &Address, asset: &AssetKind) -> Result<Balance>;

    /// Fetch a recent block reference to anchor a transaction draft.
    async fn recent_block_reference(&self) -> Result<BlockReference>;

    /// Whether an account exists on chain.
    async fn account_exists(&self, address: &Address) -> Result<bool>;

    /// Resolve the token-holding account of `owner` for `mint`, whether or
    /// not it exists yet. Derivation is chain-SDK logic and belongs to the
    /// implementation, not to the flows.
    async fn token_account_address(&self, owner: &Address, mint: &Address) -> Result<Address>;

    /// Broadcast a signed transaction and return its identifier. The
    /// identifier is valid even before confirmation.
    async fn submit_transaction(&self, tx: &SignedTransaction) -> Result<TransactionId>;

    /// Query confirmation state for a submitted transaction.
    async fn confirmation_status(&self, id: &TransactionId) -> Result<ConfirmationStatus>;
}
