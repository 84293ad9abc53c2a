//! Status display collaborator.
//!
//! Flows report progress and failures through this seam instead of talking
//! to any presentation layer directly. There are two independent channels,
//! one for authentication and one for payments, each carrying a message and
//! an error flag.

/// Sink for user-facing status lines.
///
/// Implementations must be cheap and non-blocking; flows call them inline.
pub trait StatusSink: Send + Sync {
    /// Report on the authentication channel.
    fn auth(&self, message: &str, is_error: bool);

    /// Report on the payment channel.
    fn payment(&self, message: &str, is_error: bool);

    /// Report the network label of the connected endpoint. Optional;
    /// defaults to dropping the label.
    fn network(&self, label: &str) {
        let _ = label;
    }
}

/// Sink that discards everything. Useful for headless embedding.
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn auth(&self, _message: &str, _is_error: bool) {}
    fn payment(&self, _message: &str, _is_error: bool) {}
}
