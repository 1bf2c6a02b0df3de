//! Error types for BLEU scoring and the drivers built around it.

use std::io;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BleuError>;

/// Failures a scoring call can report.
///
/// Every variant is local to one call: nothing here leaves shared state
/// behind, so callers can report the error and carry on.
#[derive(Debug, thiserror::Error)]
pub enum BleuError {
    /// The caller passed something the scorer refuses to look at
    /// (empty candidate, no usable references, zero n-gram order).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The candidate tokenized to nothing, so the brevity penalty would
    /// divide by zero.
    #[error("cannot score empty translation: candidate has no tokens")]
    DegenerateLength,

    /// Anything that went wrong while computing an otherwise valid request.
    #[error("computation failed: {reason}")]
    Computation { reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BleuError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn computation(reason: impl Into<String>) -> Self {
        Self::Computation {
            reason: reason.into(),
        }
    }

    /// True when the caller should fix its input rather than retry.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::DegenerateLength)
    }
}
