//! In-memory ledger for offline demo runs.
//!
//! Implements the chain RPC capability against process-local state: the
//! demo account starts funded, submissions always land, confirmation is
//! immediate.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use zephyr_client::config::ClientConfig;
use zephyr_client::provider::SignedTransaction;
use zephyr_client::rpc::{Balance, ChainRpc, ConfirmationStatus};
use zephyr_client::transaction::BlockReference;
use zephyr_client::{Address, AssetKind, Result, TransactionId};

const NATIVE_DECIMALS: u8 = 9;
const TOKEN_DECIMALS: u8 = 6;

/// Process-local stand-in for the chain.
pub struct OfflineLedger {
    balances: Mutex<HashMap<String, Balance>>,
    existing_accounts: Mutex<HashSet<String>>,
}

impl OfflineLedger {
    /// A ledger where `account` holds native currency and the configured
    /// token, with its token account already in place.
    pub fn funded(account: &Address, config: &ClientConfig) -> Self {
        let mut balances = HashMap::new();
        balances.insert(
            Self::balance_key(account, &AssetKind::Native),
            Balance {
                amount: 10_000_000_000, // 10 units
                decimals: NATIVE_DECIMALS,
            },
        );
        balances.insert(
            Self::balance_key(account, &AssetKind::token(config.token_mint.clone())),
            Balance {
                amount: 1_000_000_000, // 1000 tokens at 6 decimals
                decimals: TOKEN_DECIMALS,
            },
        );

        let mut existing_accounts = HashSet::new();
        existing_accounts.insert(account.as_str().to_string());
        existing_accounts.insert(Self::token_account(account, &config.token_mint));

        Self {
            balances: Mutex::new(balances),
            existing_accounts: Mutex::new(existing_accounts),
        }
    }

    fn balance_key(account: &Address, asset: &AssetKind) -> String {
        match asset {
            AssetKind::Native => format!("native:{account}"),
            AssetKind::Token { mint } => format!("token:{mint}:{account}"),
        }
    }

    fn token_account(owner: &Address, mint: &Address) -> String {
        format!("ata:{owner}:{mint}")
    }
}

#[async_trait]
impl ChainRpc for OfflineLedger {
    async fn balance(&self, account: &Address, asset: &AssetKind) -> Result<Balance> {
        let default_decimals = match asset {
            AssetKind::Native => NATIVE_DECIMALS,
            AssetKind::Token { .. } => TOKEN_DECIMALS,
        };
        Ok(self
            .balances
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&Self::balance_key(account, asset))
            .copied()
            .unwrap_or(Balance {
                amount: 0,
                decimals: default_decimals,
            }))
    }

    async fn recent_block_reference(&self) -> Result<BlockReference> {
        Ok(BlockReference::new(format!(
            "offline-{}",
            uuid::Uuid::new_v4()
        )))
    }

    async fn account_exists(&self, address: &Address) -> Result<bool> {
        Ok(self
            .existing_accounts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(address.as_str()))
    }

    async fn token_account_address(&self, owner: &Address, mint: &Address) -> Result<Address> {
        Ok(Address::new(Self::token_account(owner, mint)))
    }

    async fn submit_transaction(&self, _tx: &SignedTransaction) -> Result<TransactionId> {
        Ok(TransactionId::new(format!("offline-tx-{}", uuid::Uuid::new_v4())))
    }

    async fn confirmation_status(&self, _id: &TransactionId) -> Result<ConfirmationStatus> {
        Ok(ConfirmationStatus::Confirmed)
    }
}
