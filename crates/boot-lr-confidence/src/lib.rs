//! Bootstrap confidence intervals for diagnostic likelihood ratios
//!
//! This crate computes BCa confidence intervals for LR+ and LR- from a 2x2
//! confusion table, including the degenerate case where sensitivity or
//! specificity is exactly 0% or 100%:
//!
//! - **Ordinary arms** are resampled with replacement
//! - **Saturated arms** are drawn at a *boundary probability*, the smallest
//!   success probability whose bootstrap median reliably stays at the
//!   maximum, found by a sequential grid search
//! - **Ratios near zero** are handled by computing the interval for the
//!   reciprocal and inverting it back
//! - **Convergence failures** of the search are retried with looser
//!   parameters
//!
//! # Example
//!
//! ```rust,no_run
//! use boot_lr_confidence::estimate_likelihood_ratio;
//!
//! let result = estimate_likelihood_ratio(100, 100, 60, 100).unwrap();
//! println!("{result}");
//! assert!(result.statistics.sensitivity < 1.0);
//! ```

pub mod api;
mod bootstrap;
mod bootstrap_methods;
mod boundary;
mod consistency;
mod estimator;
mod grid_search;
mod retry;
mod types;

// Re-exports
pub use api::{estimate_likelihood_ratio, LikelihoodRatioTest, DEFAULT_RESAMPLES};
pub use bootstrap::{
    binomial_draws, proportion_bootstrap, resample_statistic, BootstrapMethod, BootstrapSample,
};
pub use bootstrap_methods::{BCaBootstrap, PercentileBootstrap};
pub use boundary::BoundaryBootstrapSampler;
pub use consistency::{MedianConsistencyProbe, DEFAULT_CONSISTENCY_REPEATS};
pub use estimator::{
    neg_lr_interval, pos_lr_interval, ArmStatistics, LRTestResult, LikelihoodRatioEstimator,
    RECOMMENDED_MIN_RESAMPLES,
};
pub use grid_search::{GridSearchOutcome, SearchParameters, SequentialGridSearch, TOLERANCE_FLOOR};
pub use retry::{ConvergenceRetry, Retried, DEFAULT_MAX_TRIES};
pub use types::{ConfidenceInterval, ConfidenceLevel};

/// BCa interval for an arbitrary replicate vector around `center`
///
/// Convenience wrapper over [`BCaBootstrap`].
pub fn bca_interval(
    replicates: &[f64],
    center: f64,
    confidence_level: ConfidenceLevel,
) -> boot_lr_core::Result<ConfidenceInterval> {
    BCaBootstrap.calculate_interval(replicates, center, confidence_level.value())
}
