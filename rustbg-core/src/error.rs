//! Error types for rustbg-core.

use thiserror::Error;

/// Result type alias for rustbg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for rustbg operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The discriminator could not classify the shoebox pixels.
    #[error("statistical failure: {0}")]
    StatisticalFailure(String),

    /// No pixel was classified as background.
    #[error("cannot compute mean of empty background set")]
    EmptyBackgroundSet,

    /// An array does not have the same length as the shoebox.
    #[error("{what} length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Merging requires at least one observation.
    #[error("cannot merge empty observation list")]
    EmptyObservationList,

    /// Observation sigma must be finite and positive.
    #[error("invalid observation sigma: {0}")]
    InvalidSigma(f64),
}

impl Error {
    /// Returns true for programming-contract errors rather than data conditions.
    #[must_use]
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, Self::LengthMismatch { .. } | Self::ConfigError(_))
    }
}
