//! Error types for bootstrapped likelihood-ratio estimation
//!
//! Provides a unified error type for all boot-lr crates. Retry decisions are
//! made on the variant, never on the rendered message.

use thiserror::Error;

/// Core error type for likelihood-ratio operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data (impossible confusion counts and the like)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// The objective or constraint produced an undefined value during a grid search
    #[error("Non-finite evaluation at x = {x}: {context}")]
    NonFiniteEvaluation { x: f64, context: String },

    /// No grid point satisfied the constraint within the current bounds
    #[error(
        "Failed to converge: no point in [{lower}, {upper}] satisfies the constraint. \
         Try loosening the tolerance, lowering the shrink factor, or raising the points per round."
    )]
    ConvergenceFailure { lower: f64, upper: f64 },

    /// The grid search refined more times than allowed
    #[error("Grid search exceeded the maximum depth of {max_depth} rounds")]
    SearchDepthExceeded { max_depth: usize },

    /// Every attempt of the retry wrapper failed to converge
    #[error("Gave up after {attempts} attempts; last failure: {last}")]
    ExhaustedRetries { attempts: usize, last: Box<Error> },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for empty input
    pub fn empty_input(_operation: &str) -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for a probability outside [0, 1]
    pub fn invalid_probability(p: f64) -> Self {
        Self::InvalidParameter(format!("Probability {p} must be in [0, 1]"))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Whether loosening the search parameters could make this failure go away
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            Self::ConvergenceFailure { .. } | Self::SearchDepthExceeded { .. }
        )
    }
}
