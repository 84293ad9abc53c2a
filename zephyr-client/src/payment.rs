//! x402 payment flow.
//!
//! One state machine per attempt:
//! Idle -> Validating -> Building -> AwaitingSignature -> Submitted ->
//! Confirming -> Confirmed | Failed.
//!
//! The balance check is advisory; the network's execution is the final
//! authority. Once a transaction id exists it is never dropped, even when
//! confirmation subsequently fails, because a confirmation failure does not
//! mean the transfer did not land.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::amount::to_base_units;
use crate::poll::{poll_until, PollConfig};
use crate::rpc::ConfirmationStatus;
use crate::session::SessionManager;
use crate::transaction::{
    create_token_account, system_transfer, token_transfer, TransactionDraft,
};
use crate::{Address, AssetKind, ClientError, Result, TransactionId};

/// Phase of a payment attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentPhase {
    /// No attempt running.
    Idle,
    /// Checking funds availability.
    Validating,
    /// Constructing the transfer draft.
    Building,
    /// Suspended on the wallet's approval prompt.
    AwaitingSignature,
    /// Broadcast accepted, id recorded.
    Submitted,
    /// Waiting on network finality.
    Confirming,
    /// Terminal: confirmed on the network.
    Confirmed,
    /// Terminal: the attempt failed.
    Failed,
}

impl PaymentPhase {
    /// Whether the attempt has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

/// A payment to execute. Immutable once constructed; one attempt each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Asset to move.
    pub asset: AssetKind,
    /// Human decimal amount, e.g. `"0.01"`.
    pub amount: String,
    /// Receiving account.
    pub recipient: Address,
}

impl PaymentRequest {
    /// A native-currency payment.
    pub fn native(amount: impl Into<String>, recipient: impl Into<Address>) -> Self {
        Self {
            asset: AssetKind::Native,
            amount: amount.into(),
            recipient: recipient.into(),
        }
    }

    /// A token payment.
    pub fn token(
        mint: impl Into<Address>,
        amount: impl Into<String>,
        recipient: impl Into<Address>,
    ) -> Self {
        Self {
            asset: AssetKind::token(mint),
            amount: amount.into(),
            recipient: recipient.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.recipient.is_empty() || self.recipient.is_placeholder() {
            return Err(ClientError::misconfigured(
                "recipient",
                "unset or placeholder address",
            ));
        }
        if let AssetKind::Token { mint } = &self.asset {
            if mint.is_empty() || mint.is_placeholder() {
                return Err(ClientError::misconfigured(
                    "token mint",
                    "unset or placeholder address",
                ));
            }
        }
        Ok(())
    }
}

/// Terminal status of an attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Broadcast, finality unknown.
    Submitted,
    /// Confirmed on the network.
    Confirmed,
    /// The attempt failed for the given reason.
    Failed(String),
}

/// What a payment attempt produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// Terminal status.
    pub status: OutcomeStatus,
    /// Transaction id, present from the moment the broadcast was accepted.
    pub transaction_id: Option<TransactionId>,
}

impl PaymentOutcome {
    fn confirmed(id: TransactionId) -> Self {
        Self {
            status: OutcomeStatus::Confirmed,
            transaction_id: Some(id),
        }
    }

    fn failed(reason: String, id: Option<TransactionId>) -> Self {
        Self {
            status: OutcomeStatus::Failed(reason),
            transaction_id: id,
        }
    }
}

/// The x402 flow.
pub struct PaymentFlow {
    session: Arc<SessionManager>,
    poll: PollConfig,
    in_flight: AtomicBool,
    phase: RwLock<PaymentPhase>,
}

impl PaymentFlow {
    /// Create the flow over a session with the default confirmation poll.
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self::with_poll_config(session, PollConfig::default())
    }

    /// Create the flow with an explicit confirmation poll bound.
    pub fn with_poll_config(session: Arc<SessionManager>, poll: PollConfig) -> Self {
        Self {
            session,
            poll,
            in_flight: AtomicBool::new(false),
            phase: RwLock::new(PaymentPhase::Idle),
        }
    }

    /// Phase of the current or most recent attempt.
    pub fn phase(&self) -> PaymentPhase {
        *self.phase.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Execute a payment attempt.
    ///
    /// Returns `Err` only while no transaction id exists (precondition,
    /// validation, signing and submission failures). Once the broadcast
    /// was accepted, failures come back as `Ok` with a `Failed` status and
    /// the id retained for manual follow-up.
    ///
    /// A second call while an attempt is in a non-terminal phase is
    /// rejected with `PaymentInProgress`; attempts are never interleaved.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, request)))]
    pub async fn pay(&self, request: &PaymentRequest) -> Result<PaymentOutcome> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            let err = ClientError::PaymentInProgress;
            self.session.status().payment(&err.to_string(), true);
            return Err(err);
        }
        let result = self.drive(request).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn drive(&self, request: &PaymentRequest) -> Result<PaymentOutcome> {
        let mut submitted: Option<TransactionId> = None;
        match self.execute(request, &mut submitted).await {
            Ok(id) => {
                self.set_phase(PaymentPhase::Confirmed);
                self.session
                    .status()
                    .payment(&format!("x402 payment confirmed - transaction {id}"), false);
                Ok(PaymentOutcome::confirmed(id))
            }
            Err(err) => {
                self.set_phase(PaymentPhase::Failed);
                match submitted {
                    Some(id) => {
                        // The transfer may still have landed; keep the
                        // reference visible for manual follow-up.
                        self.session.status().payment(
                            &format!("x402 failed after submission: {err} (transaction {id})"),
                            true,
                        );
                        Ok(PaymentOutcome::failed(err.to_string(), Some(id)))
                    }
                    None => {
                        self.session
                            .status()
                            .payment(&format!("x402 failed: {err}"), true);
                        Err(err)
                    }
                }
            }
        }
    }

    async fn execute(
        &self,
        request: &PaymentRequest,
        submitted: &mut Option<TransactionId>,
    ) -> Result<TransactionId> {
        // Both checks run before any network call.
        let account = self.session.current_account()?;
        request.validate()?;

        self.set_phase(PaymentPhase::Validating);
        self.session.status().payment(
            &format!("Preparing payment of {} ({})", request.amount, request.asset.label()),
            false,
        );
        let balance = self.session.rpc().balance(&account, &request.asset).await?;
        self.session.ensure_account(&account)?;
        let required = to_base_units(&request.amount, balance.decimals)?;
        if balance.amount < required {
            return Err(ClientError::InsufficientFunds {
                required,
                available: balance.amount,
                asset: request.asset.label(),
            });
        }

        self.set_phase(PaymentPhase::Building);
        let block_reference = self.session.rpc().recent_block_reference().await?;
        self.session.ensure_account(&account)?;
        let draft = self
            .build_draft(&account, request, required, block_reference)
            .await?;
        self.session.ensure_account(&account)?;

        self.set_phase(PaymentPhase::AwaitingSignature);
        self.session
            .status()
            .payment("Awaiting signature in the wallet", false);
        let signed = self.session.provider().sign_transaction(&draft).await?;
        self.session.ensure_account(&account)?;

        self.set_phase(PaymentPhase::Submitted);
        let id = self.session.rpc().submit_transaction(&signed).await?;
        *submitted = Some(id.clone());
        self.session.status().payment(
            &format!("Transaction submitted: {id} - awaiting confirmation"),
            false,
        );

        self.set_phase(PaymentPhase::Confirming);
        let rpc = Arc::clone(self.session.rpc());
        let poll_id = id.clone();
        poll_until(&self.poll, || {
            let rpc = Arc::clone(&rpc);
            let id = poll_id.clone();
            async move {
                match rpc.confirmation_status(&id).await? {
                    ConfirmationStatus::Pending => Ok(None),
                    ConfirmationStatus::Confirmed => Ok(Some(())),
                    ConfirmationStatus::Failed(reason) => Err(ClientError::NetworkFailure(
                        format!("transaction failed: {reason}"),
                    )),
                }
            }
        })
        .await?;

        Ok(id)
    }

    async fn build_draft(
        &self,
        account: &Address,
        request: &PaymentRequest,
        base_units: u64,
        block_reference: crate::transaction::BlockReference,
    ) -> Result<TransactionDraft> {
        let mut draft = TransactionDraft::new(account.clone(), block_reference);
        match &request.asset {
            AssetKind::Native => {
                draft.push(system_transfer(account, &request.recipient, base_units));
            }
            AssetKind::Token { mint } => {
                let rpc = self.session.rpc();
                let source = rpc.token_account_address(account, mint).await?;
                let destination = rpc.token_account_address(&request.recipient, mint).await?;
                // Creation must precede the transfer inside the same atomic
                // transaction; a transfer must never silently miss an
                // absent destination account.
                if !rpc.account_exists(&source).await? {
                    draft.push(create_token_account(account, &source, account, mint));
                }
                if !rpc.account_exists(&destination).await? {
                    draft.push(create_token_account(
                        account,
                        &destination,
                        &request.recipient,
                        mint,
                    ));
                }
                draft.push(token_transfer(&source, &destination, account, base_units));
            }
        }
        Ok(draft)
    }

    fn set_phase(&self, phase: PaymentPhase) {
        *self.phase.write().unwrap_or_else(|e| e.into_inner()) = phase;
    }
}
