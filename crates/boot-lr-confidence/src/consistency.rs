//! Median-consistency probe
//!
//! Decides whether a candidate success probability reliably produces a
//! saturated bootstrap median: every one of several batches of binomial
//! draws must have a median equal to the number of trials. The predicate is
//! stochastic; evaluating it twice at the same probability can disagree near
//! the boundary.

use crate::bootstrap::binomial_draws;
use boot_lr_core::{math::median_u64, Error, Result};
use rand::Rng;
use tracing::{trace, warn};

/// Number of batches that must all saturate
pub const DEFAULT_CONSISTENCY_REPEATS: usize = 5;

/// Stochastic constraint used by the boundary search
#[derive(Debug, Clone, Copy)]
pub struct MedianConsistencyProbe {
    trials: u64,
    resamples: usize,
    repeats: usize,
    warn: bool,
}

impl MedianConsistencyProbe {
    pub fn new(trials: u64, resamples: usize) -> Self {
        Self {
            trials,
            resamples,
            repeats: DEFAULT_CONSISTENCY_REPEATS,
            warn: true,
        }
    }

    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Whether probing outside [0, 1] logs a warning
    pub fn with_warnings(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    /// True only if every batch of draws at `pr` has median equal to `trials`
    ///
    /// Probabilities outside [0, 1] are infeasible rather than errors so the
    /// grid search can probe past the edge of the domain.
    pub fn is_saturated<R>(&self, pr: f64, rng: &mut R) -> Result<bool>
    where
        R: Rng + ?Sized,
    {
        if pr.is_nan() {
            return Err(Error::NonFiniteEvaluation {
                x: pr,
                context: "median consistency probe".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&pr) {
            if self.warn {
                warn!("Probability {pr} lies outside [0, 1]; treating it as not saturated");
            }
            return Ok(false);
        }

        let target = self.trials as f64;
        for repeat in 0..self.repeats {
            let mut draws = binomial_draws(self.trials, pr, self.resamples, rng)?;
            let median = median_u64(&mut draws)?;
            if median != target {
                trace!(pr, repeat, median, "median not saturated");
                return Ok(false);
            }
        }
        Ok(true)
    }
}
