//! Error types for Zephyr client operations.
//!
//! Every flow catches these at its boundary and converts them into a
//! one-line status message; nothing propagates to a global handler.

/// Comprehensive error type for session, auth and payment operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No wallet provider is reachable and no mobile handshake is possible.
    #[error("no wallet provider found - install a wallet extension")]
    ProviderMissing,

    /// The user declined a connect or signing prompt in the wallet UI.
    #[error("request declined in the wallet")]
    UserRejected,

    /// An operation that requires a connected session was invoked without one,
    /// or the session disconnected while the operation was in flight.
    #[error("wallet is not connected")]
    NotConnected,

    /// A required configuration value is unset, malformed or a placeholder.
    #[error("invalid {field}: {reason}")]
    Misconfigured {
        /// Field or parameter name.
        field: String,
        /// Reason for invalidity.
        reason: String,
    },

    /// The payer's balance is below the requested amount. Advisory only:
    /// the network's execution remains the final authority.
    #[error("insufficient funds: need {required} base units of {asset}, have {available}")]
    InsufficientFunds {
        /// Required amount in base units.
        required: u64,
        /// Available amount in base units.
        available: u64,
        /// Asset label.
        asset: String,
    },

    /// RPC, submission or confirmation failure. During confirmation this
    /// does not imply the underlying transaction did not execute.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// A signature came back attributed to an account other than the
    /// connected one.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// A payment attempt is already in a non-terminal phase; concurrent
    /// attempts against the same session are never interleaved.
    #[error("a payment is already in progress")]
    PaymentInProgress,
}

impl ClientError {
    /// Create a misconfiguration error.
    pub fn misconfigured(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Misconfigured {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a network failure from any displayable error.
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::NetworkFailure(err.to_string())
    }

    /// True when a fresh user-triggered attempt could plausibly succeed
    /// without reconfiguration.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::UserRejected)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::NetworkFailure(format!("serialization: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_line() {
        let errors = [
            ClientError::ProviderMissing,
            ClientError::UserRejected,
            ClientError::NotConnected,
            ClientError::misconfigured("recipient", "placeholder address"),
            ClientError::InsufficientFunds {
                required: 10_000,
                available: 50,
                asset: "token EPjF..Dt1v".to_string(),
            },
            ClientError::NetworkFailure("connection reset".to_string()),
            ClientError::VerificationFailed("signer mismatch".to_string()),
            ClientError::PaymentInProgress,
        ];
        for err in errors {
            let line = err.to_string();
            assert!(!line.is_empty());
            assert!(!line.contains('\n'));
        }
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = ClientError::InsufficientFunds {
            required: 10_000,
            available: 9_999,
            asset: "native".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("10000"));
        assert!(text.contains("9999"));
        assert!(text.contains("native"));
    }

    #[test]
    fn test_retryable() {
        assert!(ClientError::network("timeout").is_retryable());
        assert!(ClientError::UserRejected.is_retryable());
        assert!(!ClientError::NotConnected.is_retryable());
        assert!(!ClientError::misconfigured("amount", "not a number").is_retryable());
    }
}
