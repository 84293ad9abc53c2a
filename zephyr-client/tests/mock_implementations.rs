//! Shared mock provider, chain RPC and status sink for flow tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use zephyr_client::config::ClientConfig;
use zephyr_client::provider::{
    ProviderCapabilities, SignedMessage, SignedTransaction, WalletProvider,
};
use zephyr_client::rpc::{Balance, ChainRpc, ConfirmationStatus};
use zephyr_client::session::SessionManager;
use zephyr_client::status::StatusSink;
use zephyr_client::transaction::{BlockReference, TransactionDraft};
use zephyr_client::{Address, AssetKind, ClientError, Result, TransactionId};

pub const ACCOUNT: &str = "PayerAccount11111111111111111111111111111111";
pub const OTHER_ACCOUNT: &str = "OtherAccount11111111111111111111111111111111";
pub const RECEIVER: &str = "Receiver111111111111111111111111111111111111";
pub const MINT: &str = "Mint44444444444444444444444444444444444444444";

/// Wallet provider test double.
pub struct MockProvider {
    pub available: bool,
    pub trusted: bool,
    pub capabilities: ProviderCapabilities,
    pub account: Address,
    pub reject_connect: bool,
    pub reject_sign: bool,
    /// When set, signatures come back attributed to this account instead
    /// of the connected one.
    pub signer_override: Option<Address>,
    pub connect_calls: AtomicU32,
    pub signed_messages: Mutex<Vec<Vec<u8>>>,
    pub signed_drafts: Mutex<Vec<TransactionDraft>>,
    /// Signaled when `sign_transaction` is entered.
    pub sign_entered: Arc<Notify>,
    /// When present, `sign_transaction` blocks until this is notified.
    pub sign_gate: Option<Arc<Notify>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            available: true,
            trusted: false,
            capabilities: ProviderCapabilities::complete(),
            account: Address::new(ACCOUNT),
            reject_connect: false,
            reject_sign: false,
            signer_override: None,
            connect_calls: AtomicU32::new(0),
            signed_messages: Mutex::new(Vec::new()),
            signed_drafts: Mutex::new(Vec::new()),
            sign_entered: Arc::new(Notify::new()),
            sign_gate: None,
        }
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    pub fn trusted() -> Self {
        Self {
            trusted: true,
            ..Self::default()
        }
    }

    pub fn rejecting_connect() -> Self {
        Self {
            reject_connect: true,
            ..Self::default()
        }
    }

    pub fn rejecting_sign() -> Self {
        Self {
            reject_sign: true,
            ..Self::default()
        }
    }

    pub fn without_message_signing() -> Self {
        Self {
            capabilities: ProviderCapabilities {
                connect: true,
                sign_message: false,
                sign_transaction: true,
            },
            ..Self::default()
        }
    }

    pub fn with_signer_override(mut self, signer: impl Into<Address>) -> Self {
        self.signer_override = Some(signer.into());
        self
    }

    pub fn with_sign_gate(mut self, gate: Arc<Notify>) -> Self {
        self.sign_gate = Some(gate);
        self
    }

    fn effective_signer(&self) -> Address {
        self.signer_override
            .clone()
            .unwrap_or_else(|| self.account.clone())
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }

    fn has_trusted_session(&self) -> bool {
        self.trusted
    }

    async fn connect(&self) -> Result<Address> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_connect {
            return Err(ClientError::UserRejected);
        }
        Ok(self.account.clone())
    }

    async fn sign_message(&self, message: &[u8]) -> Result<SignedMessage> {
        if self.reject_sign {
            return Err(ClientError::UserRejected);
        }
        self.signed_messages.lock().unwrap().push(message.to_vec());
        Ok(SignedMessage {
            signer: self.effective_signer(),
            signature: message.to_vec(),
        })
    }

    async fn sign_transaction(&self, draft: &TransactionDraft) -> Result<SignedTransaction> {
        self.sign_entered.notify_one();
        if let Some(gate) = &self.sign_gate {
            gate.notified().await;
        }
        if self.reject_sign {
            return Err(ClientError::UserRejected);
        }
        self.signed_drafts.lock().unwrap().push(draft.clone());
        Ok(SignedTransaction {
            bytes: serde_json::to_vec(draft).unwrap(),
            signers: vec![self.effective_signer()],
        })
    }
}

/// Chain RPC test double with scriptable balances, accounts and
/// confirmation behavior, plus call counters for no-network assertions.
#[derive(Default)]
pub struct MockRpc {
    balances: Mutex<HashMap<String, Balance>>,
    existing_accounts: Mutex<HashSet<String>>,
    confirmation_script: Mutex<VecDeque<ConfirmationStatus>>,
    pub confirmation_error: Mutex<Option<String>>,
    pub submit_error: Mutex<Option<String>>,
    pub always_pending: AtomicBool,
    pub balance_calls: AtomicU32,
    pub block_reference_calls: AtomicU32,
    pub submit_calls: AtomicU32,
    pub confirmation_calls: AtomicU32,
    pub submitted: Mutex<Vec<Vec<u8>>>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self::default()
    }

    fn balance_key(account: &Address, asset: &AssetKind) -> String {
        match asset {
            AssetKind::Native => format!("native:{account}"),
            AssetKind::Token { mint } => format!("token:{mint}:{account}"),
        }
    }

    pub fn set_native_balance(&self, account: &str, amount: u64) {
        self.balances.lock().unwrap().insert(
            Self::balance_key(&Address::new(account), &AssetKind::Native),
            Balance { amount, decimals: 9 },
        );
    }

    pub fn set_token_balance(&self, account: &str, mint: &str, amount: u64, decimals: u8) {
        self.balances.lock().unwrap().insert(
            Self::balance_key(&Address::new(account), &AssetKind::token(mint)),
            Balance { amount, decimals },
        );
    }

    pub fn add_existing_account(&self, address: &str) {
        self.existing_accounts
            .lock()
            .unwrap()
            .insert(address.to_string());
    }

    pub fn script_confirmations(&self, statuses: impl IntoIterator<Item = ConfirmationStatus>) {
        self.confirmation_script
            .lock()
            .unwrap()
            .extend(statuses);
    }

    /// The token-account address this mock hands out for an owner/mint pair.
    pub fn token_account(owner: &str, mint: &str) -> String {
        format!("ata:{owner}:{mint}")
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn balance(&self, account: &Address, asset: &AssetKind) -> Result<Balance> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&Self::balance_key(account, asset))
            .copied()
            .unwrap_or(Balance {
                amount: 0,
                decimals: 6,
            }))
    }

    async fn recent_block_reference(&self) -> Result<BlockReference> {
        self.block_reference_calls.fetch_add(1, Ordering::SeqCst);
        Ok(BlockReference::new("MockBlockRef11111111111111111111"))
    }

    async fn account_exists(&self, address: &Address) -> Result<bool> {
        Ok(self
            .existing_accounts
            .lock()
            .unwrap()
            .contains(address.as_str()))
    }

    async fn token_account_address(&self, owner: &Address, mint: &Address) -> Result<Address> {
        Ok(Address::new(Self::token_account(owner.as_str(), mint.as_str())))
    }

    async fn submit_transaction(&self, tx: &SignedTransaction) -> Result<TransactionId> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.submit_error.lock().unwrap().clone() {
            return Err(ClientError::NetworkFailure(reason));
        }
        self.submitted.lock().unwrap().push(tx.bytes.clone());
        let n = self.submitted.lock().unwrap().len();
        Ok(TransactionId::new(format!("tx-{n}")))
    }

    async fn confirmation_status(&self, _id: &TransactionId) -> Result<ConfirmationStatus> {
        self.confirmation_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.confirmation_error.lock().unwrap().clone() {
            return Err(ClientError::NetworkFailure(reason));
        }
        if self.always_pending.load(Ordering::SeqCst) {
            return Ok(ConfirmationStatus::Pending);
        }
        Ok(self
            .confirmation_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ConfirmationStatus::Confirmed))
    }
}

/// Status sink that records every line per channel.
#[derive(Default)]
pub struct RecordingStatus {
    pub lines: Mutex<Vec<(&'static str, String, bool)>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel_lines(&self, channel: &str) -> Vec<(String, bool)> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _, _)| *c == channel)
            .map(|(_, message, is_error)| (message.clone(), *is_error))
            .collect()
    }

    pub fn has_error_containing(&self, channel: &str, needle: &str) -> bool {
        self.channel_lines(channel)
            .iter()
            .any(|(message, is_error)| *is_error && message.contains(needle))
    }

    pub fn has_line_containing(&self, channel: &str, needle: &str) -> bool {
        self.channel_lines(channel)
            .iter()
            .any(|(message, _)| message.contains(needle))
    }
}

impl StatusSink for RecordingStatus {
    fn auth(&self, message: &str, is_error: bool) {
        self.lines
            .lock()
            .unwrap()
            .push(("auth", message.to_string(), is_error));
    }

    fn payment(&self, message: &str, is_error: bool) {
        self.lines
            .lock()
            .unwrap()
            .push(("payment", message.to_string(), is_error));
    }

    fn network(&self, label: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(("network", label.to_string(), false));
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::devnet(MINT, RECEIVER)
}

/// Build a session manager over mocks, handing back the shared handles so
/// tests can script and inspect them.
pub fn make_session(
    provider: MockProvider,
    rpc: MockRpc,
    config: ClientConfig,
) -> (
    Arc<SessionManager>,
    Arc<MockProvider>,
    Arc<MockRpc>,
    Arc<RecordingStatus>,
) {
    let provider = Arc::new(provider);
    let rpc = Arc::new(rpc);
    let status = Arc::new(RecordingStatus::new());
    let session = Arc::new(
        SessionManager::new(
            provider.clone(),
            rpc.clone(),
            status.clone(),
            config,
        )
        .expect("mock provider supports sessions"),
    );
    (session, provider, rpc, status)
}
