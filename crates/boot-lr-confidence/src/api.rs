//! High-level API for likelihood-ratio confidence intervals
//!
//! This module provides the configured entry point ([`LikelihoodRatioTest`])
//! and a one-call convenience function with the usual defaults.

use crate::{
    consistency::DEFAULT_CONSISTENCY_REPEATS,
    estimator::{LRTestResult, LikelihoodRatioEstimator},
    grid_search::SearchParameters,
    retry::{ConvergenceRetry, DEFAULT_MAX_TRIES},
    types::ConfidenceLevel,
};
use boot_lr_core::{ConfusionCounts, Error, Result};
use rand::{rngs::StdRng, thread_rng, Rng, SeedableRng};
use tracing::{debug, instrument};

/// Default number of bootstrap resamples
pub const DEFAULT_RESAMPLES: usize = 50_000;

/// Builder-configured likelihood-ratio test
///
/// # Example
/// ```rust,no_run
/// use boot_lr_confidence::LikelihoodRatioTest;
/// use boot_lr_core::ConfusionCounts;
///
/// let counts = ConfusionCounts::new(100, 100, 60, 100).unwrap();
/// let result = LikelihoodRatioTest::new()
///     .with_resamples(50_000)
///     .with_seed(7)
///     .run(&counts)
///     .unwrap();
/// println!("{result}");
/// ```
#[derive(Debug, Clone)]
pub struct LikelihoodRatioTest {
    resamples: usize,
    verbose: bool,
    search: SearchParameters,
    max_tries: usize,
    confidence_level: ConfidenceLevel,
    repeats: usize,
    seed: Option<u64>,
}

impl Default for LikelihoodRatioTest {
    fn default() -> Self {
        Self::new()
    }
}

impl LikelihoodRatioTest {
    pub fn new() -> Self {
        Self {
            resamples: DEFAULT_RESAMPLES,
            verbose: false,
            search: SearchParameters::default(),
            max_tries: DEFAULT_MAX_TRIES,
            confidence_level: ConfidenceLevel::NINETY_FIVE,
            repeats: DEFAULT_CONSISTENCY_REPEATS,
            seed: None,
        }
    }

    /// Set the number of bootstrap resamples
    pub fn with_resamples(mut self, resamples: usize) -> Self {
        self.resamples = resamples;
        self
    }

    /// Log search rounds and retries at info level
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Starting parameters for the boundary search
    pub fn with_search_parameters(mut self, search: SearchParameters) -> Self {
        self.search = search;
        self
    }

    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Set the confidence level
    pub fn with_confidence_level(mut self, confidence_level: ConfidenceLevel) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Batches the median-consistency probe requires to agree
    pub fn with_consistency_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.resamples == 0 {
            return Err(Error::InvalidParameter("resamples must be positive".to_string()));
        }
        if self.repeats == 0 {
            return Err(Error::InvalidParameter(
                "consistency repeats must be at least 1".to_string(),
            ));
        }
        self.search.validate()
    }

    /// Run the test with an RNG seeded from the configured seed (or entropy)
    pub fn run(&self, counts: &ConfusionCounts) -> Result<LRTestResult> {
        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        debug!(seed, "seeding bootstrap RNG");
        let mut rng = StdRng::seed_from_u64(seed);
        self.run_with_rng(counts, &mut rng)
    }

    /// Run the test drawing from a caller-supplied RNG
    #[instrument(skip(self, rng), fields(resamples = self.resamples, max_tries = self.max_tries))]
    pub fn run_with_rng<R>(&self, counts: &ConfusionCounts, rng: &mut R) -> Result<LRTestResult>
    where
        R: Rng + ?Sized,
    {
        self.validate()?;
        let retried = ConvergenceRetry::new(self.max_tries)?
            .with_verbose(self.verbose)
            .run(self.search, |search| {
                LikelihoodRatioEstimator::new(self.resamples, search)
                    .with_confidence_level(self.confidence_level)
                    .with_repeats(self.repeats)
                    .with_verbose(self.verbose)
                    .estimate(counts, &mut *rng)
            })?;

        Ok(LRTestResult {
            attempts: retried.attempts,
            ..retried.value
        })
    }
}

/// Likelihood ratios with BCa intervals using the default configuration
///
/// Invalid counts fail immediately; convergence failures of the boundary
/// search are retried with looser parameters.
pub fn estimate_likelihood_ratio(
    true_positive: u64,
    total_disease_positive: u64,
    true_negative: u64,
    total_disease_negative: u64,
) -> Result<LRTestResult> {
    let counts = ConfusionCounts::new(
        true_positive,
        total_disease_positive,
        true_negative,
        total_disease_negative,
    )?;
    LikelihoodRatioTest::new().run(&counts)
}
