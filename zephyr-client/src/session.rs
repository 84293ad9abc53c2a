//! Wallet session lifecycle.
//!
//! The session manager is the only place connection state mutates. Flows
//! read it through [`SessionManager::current_account`] and re-check it
//! after every suspension point, so a disconnect mid-flight is detected
//! instead of assumed away.

use std::sync::{Arc, RwLock};

use crate::amount::format_base_units;
use crate::config::ClientConfig;
use crate::deeplink;
use crate::provider::WalletProvider;
use crate::rpc::ChainRpc;
use crate::status::StatusSink;
use crate::{Address, AssetKind, ClientError, Result};

/// Connection state of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No wallet attached.
    Disconnected,
    /// Account access requested, waiting on the provider.
    Connecting,
    /// Wallet attached as the given account.
    Connected(Address),
}

/// What a [`SessionManager::connect`] call produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Session established for this account.
    Connected(Address),
    /// No in-page provider; the host must navigate to this wallet-app
    /// handshake URL. The session stays disconnected and resumes via
    /// [`SessionManager::resume`] after the round trip.
    RedirectIssued(String),
}

/// Result of the load-time resume check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResumeOutcome {
    /// The page URL with the return marker stripped. The host must replace
    /// the visible URL with this so the marker is consumed exactly once.
    pub cleaned_url: String,
    /// Whether a silent connect attempt was made.
    pub attempted: bool,
}

/// Owner of connection state, the provider handle and the RPC handle.
pub struct SessionManager {
    provider: Arc<dyn WalletProvider>,
    rpc: Arc<dyn ChainRpc>,
    status: Arc<dyn StatusSink>,
    config: ClientConfig,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Create a session manager over a provider and an RPC handle.
    ///
    /// Provider capabilities are checked here, once; a provider that cannot
    /// grant account access plus at least one signing path is rejected with
    /// `ProviderMissing`.
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        rpc: Arc<dyn ChainRpc>,
        status: Arc<dyn StatusSink>,
        config: ClientConfig,
    ) -> Result<Self> {
        if !provider.capabilities().supports_session() {
            return Err(ClientError::ProviderMissing);
        }
        Ok(Self {
            provider,
            rpc,
            status,
            config,
            state: RwLock::new(SessionState::Disconnected),
        })
    }

    /// Current connection state.
    pub fn state(&self) -> SessionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The connected account, or `NotConnected`.
    pub fn current_account(&self) -> Result<Address> {
        match self.state() {
            SessionState::Connected(account) => Ok(account),
            _ => Err(ClientError::NotConnected),
        }
    }

    /// Verify the session is still connected as `expected`. Flows call this
    /// after every await so a mid-flight disconnect fails the attempt.
    pub fn ensure_account(&self, expected: &Address) -> Result<()> {
        match self.current_account() {
            Ok(account) if &account == expected => Ok(()),
            _ => Err(ClientError::NotConnected),
        }
    }

    /// Wallet provider handle.
    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }

    /// Chain RPC handle.
    pub fn rpc(&self) -> &Arc<dyn ChainRpc> {
        &self.rpc
    }

    /// Status sink.
    pub fn status(&self) -> &Arc<dyn StatusSink> {
        &self.status
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connect the wallet.
    ///
    /// Idempotent: while already connected this is a no-op that re-reports
    /// the current account. Failures are surfaced as one-line status
    /// messages and returned; the state always rolls back to disconnected,
    /// never to a partial session.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn connect(&self) -> Result<ConnectOutcome> {
        if let SessionState::Connected(account) = self.state() {
            self.status
                .auth(&format!("Wallet connected: {}", account.short()), false);
            return Ok(ConnectOutcome::Connected(account));
        }

        if !self.provider.is_available() {
            if let Some(deep_link) = &self.config.deep_link {
                let url = deeplink::handshake_url(deep_link);
                self.status
                    .auth("Continuing in the wallet app", false);
                return Ok(ConnectOutcome::RedirectIssued(url));
            }
            let err = ClientError::ProviderMissing;
            self.status.auth(&err.to_string(), true);
            return Err(err);
        }

        self.set_state(SessionState::Connecting);
        match self.provider.connect().await {
            Ok(account) => {
                self.set_state(SessionState::Connected(account.clone()));
                self.status
                    .network(&format!("Network: {}", self.config.network_label()));
                self.status
                    .auth(&format!("Wallet connected: {}", account.short()), false);
                self.report_token_balance(&account).await;
                Ok(ConnectOutcome::Connected(account))
            }
            Err(err) => {
                self.set_state(SessionState::Disconnected);
                self.status
                    .auth(&format!("Wallet connect failed: {err}"), true);
                Err(err)
            }
        }
    }

    /// Tear the session down. The single mutation exit besides `connect`.
    pub fn disconnect(&self) {
        self.set_state(SessionState::Disconnected);
    }

    /// Load-time resume check.
    ///
    /// Attempts a silent connect at most once, only when the URL carries
    /// the deep-link return marker or the provider reports an existing
    /// trusted session. Errors from the attempt are suppressed. The
    /// returned URL has the marker stripped; an eager unconditional
    /// auto-connect is deliberately not performed.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn resume(&self, current_url: &str) -> ResumeOutcome {
        let (marker_present, cleaned_url) = deeplink::consume_return_marker(current_url);
        let trusted = self.provider.is_available() && self.provider.has_trusted_session();
        let attempted = marker_present || trusted;
        if attempted {
            let _ = self.connect().await;
        }
        ResumeOutcome {
            cleaned_url,
            attempted,
        }
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Best-effort display of the configured token balance against the
    /// required-hold threshold. Never fails the connect.
    async fn report_token_balance(&self, account: &Address) {
        if !self.config.token_configured() {
            self.status
                .payment("Set the token mint in the configuration to enable x402", true);
            return;
        }
        let asset = AssetKind::Token {
            mint: self.config.token_mint.clone(),
        };
        match self.rpc.balance(account, &asset).await {
            Ok(balance) => {
                let human = format_base_units(balance.amount, balance.decimals);
                self.status.payment(
                    &format!(
                        "Token balance: {human} (need {} to access the dashboard)",
                        self.config.required_hold
                    ),
                    false,
                );
            }
            Err(_) => {
                self.status.payment(
                    "Could not read token balance - check the token mint and network",
                    true,
                );
            }
        }
    }
}
