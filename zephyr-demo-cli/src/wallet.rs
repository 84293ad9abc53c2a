//! Local software wallet for the demo.
//!
//! Holds an ed25519 key in process memory and signs whatever the flows ask
//! for. This stands in for a real wallet extension or app; it approves
//! everything without prompting.

use anyhow::{Context, Result};
use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;

use zephyr_client::provider::{
    ProviderCapabilities, SignedMessage, SignedTransaction, WalletProvider,
};
use zephyr_client::transaction::TransactionDraft;
use zephyr_client::{Address, ClientError};

/// In-memory signing provider backed by an ed25519 key.
pub struct SoftwareWallet {
    key: SigningKey,
    address: Address,
}

impl SoftwareWallet {
    /// Load the key from the `ZEPHYR_DEMO_SEED` hex seed, or generate a
    /// fresh one for this run.
    pub fn from_env_or_generate() -> Result<Self> {
        let key = match std::env::var("ZEPHYR_DEMO_SEED") {
            Ok(seed_hex) => {
                let bytes = hex::decode(seed_hex.trim())
                    .context("ZEPHYR_DEMO_SEED is not valid hex")?;
                let seed: [u8; 32] = bytes
                    .try_into()
                    .map_err(|_| anyhow::anyhow!("ZEPHYR_DEMO_SEED must be 32 bytes of hex"))?;
                SigningKey::from_bytes(&seed)
            }
            Err(_) => SigningKey::generate(&mut OsRng),
        };
        let address = Address::new(hex::encode(key.verifying_key().to_bytes()));
        Ok(Self { key, address })
    }

    /// The wallet's account address.
    pub fn address(&self) -> &Address {
        &self.address
    }
}

#[async_trait]
impl WalletProvider for SoftwareWallet {
    fn is_available(&self) -> bool {
        true
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::complete()
    }

    async fn connect(&self) -> zephyr_client::Result<Address> {
        Ok(self.address.clone())
    }

    async fn sign_message(&self, message: &[u8]) -> zephyr_client::Result<SignedMessage> {
        let signature = self.key.sign(message);
        Ok(SignedMessage {
            signer: self.address.clone(),
            signature: signature.to_bytes().to_vec(),
        })
    }

    async fn sign_transaction(
        &self,
        draft: &TransactionDraft,
    ) -> zephyr_client::Result<SignedTransaction> {
        let payload = serde_json::to_vec(draft).map_err(ClientError::from)?;
        let signature = self.key.sign(&payload);

        // Signature first, then the payload it covers.
        let mut bytes = signature.to_bytes().to_vec();
        bytes.extend_from_slice(&payload);
        Ok(SignedTransaction {
            bytes,
            signers: vec![self.address.clone()],
        })
    }
}
