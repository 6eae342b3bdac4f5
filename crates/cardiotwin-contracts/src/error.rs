//! Error types for the CardioTwin simulator.
//!
//! All fallible operations across the workspace return `CardioResult<T>`.
//! The HTTP layer maps each variant to a status code; the simulation loop
//! recovers `PredictionFailure` locally and never propagates it.

use thiserror::Error;

/// The unified error type for the CardioTwin workspace.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CardioError {
    /// A request body was missing, malformed, or carried an unacceptable value.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// An alert index did not address an entry in the alert log.
    #[error("alert index {index} out of range (log holds {len} alerts)")]
    OutOfRange { index: usize, len: usize },

    /// The classifier could not produce a label for a feature vector.
    ///
    /// Recovered inside the simulation tick; never surfaced to HTTP callers.
    #[error("prediction failed: {reason}")]
    PredictionFailure { reason: String },

    /// A value could not be rendered as plain JSON (e.g. a non-finite float).
    #[error("serialization failed: {reason}")]
    SerializationFailure { reason: String },

    /// The classifier artifact is missing or corrupt.
    ///
    /// Fatal at startup: the process cannot serve without a model.
    #[error("model load failed: {reason}")]
    ModelLoad { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl CardioError {
    /// Shorthand for building an `InvalidInput` error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the CardioTwin crates.
pub type CardioResult<T> = Result<T, CardioError>;
