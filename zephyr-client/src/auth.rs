//! x401 authentication flow.
//!
//! Produces a signed, timestamped assertion binding the connected account
//! to this client instance. The fresh timestamp keeps a captured signature
//! from being replayed as a later assertion. The signer check at the end is
//! a client-side sanity check only; nothing server-side validates it in
//! this scope.

use std::sync::Arc;

use chrono::Utc;

use crate::session::SessionManager;
use crate::transaction::{memo_instruction, TransactionDraft};
use crate::{Address, ClientError, Result};

/// Fixed protocol tag embedded in every assertion message.
pub const PROTOCOL_TAG: &str = "Zephyr x401";

/// A signed proof-of-identity assertion. Built and consumed within a single
/// [`AuthFlow::authenticate`] call; never persisted.
#[derive(Clone, Debug)]
pub struct AuthAssertion {
    /// The signed message, with the timestamp embedded.
    pub message: String,
    /// Opaque signature bytes.
    pub signature: Vec<u8>,
    /// Account the signature is attributed to.
    pub signer: Address,
}

/// The x401 flow.
pub struct AuthFlow {
    session: Arc<SessionManager>,
}

impl AuthFlow {
    /// Create the flow over a session.
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Run the flow: build the message, obtain a signature, verify the
    /// signer matches the session account.
    ///
    /// Success and failure are both reported on the auth status channel;
    /// errors never propagate past this boundary unseen.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn authenticate(&self) -> Result<AuthAssertion> {
        match self.run().await {
            Ok(assertion) => {
                self.session.status().auth(
                    &format!("x401 complete - wallet {} linked", assertion.signer.short()),
                    false,
                );
                Ok(assertion)
            }
            Err(err) => {
                self.session
                    .status()
                    .auth(&format!("x401 failed: {err}"), true);
                Err(err)
            }
        }
    }

    async fn run(&self) -> Result<AuthAssertion> {
        let account = self.session.current_account()?;
        let message = format!("{PROTOCOL_TAG}: link wallet at {}", Utc::now().to_rfc3339());

        let capabilities = self.session.provider().capabilities();
        let (signer, signature) = if capabilities.sign_message {
            let signed = self
                .session
                .provider()
                .sign_message(message.as_bytes())
                .await?;
            (signed.signer, signed.signature)
        } else {
            // No direct message signing: wrap the message in a zero-value
            // memo transaction and take the signer from its signature set.
            let block_reference = self.session.rpc().recent_block_reference().await?;
            self.session.ensure_account(&account)?;
            let draft = TransactionDraft::new(account.clone(), block_reference)
                .with(memo_instruction(&message));
            let signed = self.session.provider().sign_transaction(&draft).await?;
            let signer = signed
                .signers
                .iter()
                .find(|signer| **signer == account)
                .or_else(|| signed.signers.first())
                .cloned()
                .ok_or_else(|| {
                    ClientError::VerificationFailed("transaction came back unsigned".to_string())
                })?;
            (signer, signed.bytes)
        };

        self.session.ensure_account(&account)?;
        if signer != account {
            return Err(ClientError::VerificationFailed(format!(
                "signer {} does not match connected account {}",
                signer.short(),
                account.short()
            )));
        }

        Ok(AuthAssertion {
            message,
            signature,
            signer,
        })
    }
}
