//! # Relay Errors

use thiserror::Error;

/// Failures of an outbound webhook call.
///
/// There is deliberately no retry machinery behind these. Relayed commands
/// are interactive, and a late retry would land mid-conversation; the user
/// re-issues the command instead.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The endpoint could not be reached before the deadline, whether by
    /// connection failure or timeout.
    #[error("webhook unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status. The body is kept
    /// unmodified for logging.
    #[error("webhook rejected the request with status {status}")]
    Rejected { status: u16, body: String },
}
