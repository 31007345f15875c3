//! Error kinds the engine surfaces (spec §7).

use crate::Usage;
use thiserror::Error;

/// Errors the engine can raise.
///
/// Only [`EngineError::NoObjectGenerated`] and [`EngineError::Transport`]
/// ever reach a terminal promise; every other variant is recorded on the
/// span or surfaced as a recoverable `fullStream` event (spec §7
/// "Propagation policy").
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Unsupported shape/mode combination, a missing required field, or a
    /// malformed schema descriptor. Raised synchronously before any
    /// provider call is made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The final text could not be parsed into a value satisfying the
    /// output strategy, whether because parsing failed outright or
    /// because schema validation rejected it.
    #[error("no object generated: {cause}")]
    NoObjectGenerated {
        /// Why the object could not be produced.
        cause: Box<EngineError>,
        /// The complete raw text accumulated before the failure.
        text: String,
        /// Token usage for the call that produced `text`.
        usage: Usage,
    },

    /// A parsed value did not satisfy the schema descriptor's `validate`.
    #[error("type validation failed: {0}")]
    TypeValidation(String),

    /// A recoverable error surfaced by the provider mid-stream. Does not
    /// by itself fail the call.
    #[error("provider error: {0}")]
    ProviderError(String),

    /// A consumer cancelled a derived stream, or the call's abort signal
    /// fired.
    #[error("cancelled")]
    Cancelled,

    /// Any other failure during provider interaction — the orchestrator
    /// moves to Failing and rejects every outstanding terminal promise
    /// with this error.
    #[error("transport error: {0}")]
    Transport(String),
}

impl EngineError {
    /// Wraps `cause` as a [`EngineError::NoObjectGenerated`] carrying the
    /// text accumulated so far and the call's usage.
    pub fn no_object_generated(cause: EngineError, text: impl Into<String>, usage: Usage) -> Self {
        EngineError::NoObjectGenerated {
            cause: Box::new(cause),
            text: text.into(),
            usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_object_generated_display_includes_cause() {
        let err = EngineError::no_object_generated(
            EngineError::TypeValidation("missing field `content`".into()),
            "{}".into(),
            Usage::default(),
        );
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_error_is_clone_for_fanning_out_to_every_waiter() {
        let err = EngineError::Cancelled;
        let _ = err.clone();
    }
}
