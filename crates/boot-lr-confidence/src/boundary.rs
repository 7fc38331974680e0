//! Bootstrap samples for saturated proportions
//!
//! When every trial in an arm succeeded, ordinary resampling returns the same
//! value every time. Instead we search for the smallest success probability
//! whose bootstrap median still reliably equals the number of trials, and
//! draw the replicates at that probability. The probability found stands in
//! for the observed rate of 1.0 as the arm's center value.

use crate::{
    bootstrap::{binomial_draws, BootstrapSample},
    consistency::{MedianConsistencyProbe, DEFAULT_CONSISTENCY_REPEATS},
    grid_search::{SearchParameters, SequentialGridSearch},
};
use boot_lr_core::{Arm, Error, Result, Saturation};
use rand::Rng;
use tracing::{debug, info, instrument};

/// Grid search plus median-consistency probe for a 100% (or 0%) arm
#[derive(Debug, Clone)]
pub struct BoundaryBootstrapSampler {
    search: SequentialGridSearch,
    resamples: usize,
    repeats: usize,
    verbose: bool,
}

impl BoundaryBootstrapSampler {
    pub fn new(params: SearchParameters, resamples: usize) -> Result<Self> {
        if resamples == 0 {
            return Err(Error::InvalidParameter("resamples must be positive".to_string()));
        }
        Ok(Self {
            search: SequentialGridSearch::new(params)?,
            resamples,
            repeats: DEFAULT_CONSISTENCY_REPEATS,
            verbose: false,
        })
    }

    /// Batches the probe requires to agree
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.search = self.search.with_verbose(verbose);
        self.verbose = verbose;
        self
    }

    /// Replicates standing in for an observed `trials`/`trials`
    ///
    /// The returned sample carries the boundary probability.
    #[instrument(skip(self, rng), fields(resamples = self.resamples))]
    pub fn sample_saturated<R>(&self, trials: u64, rng: &mut R) -> Result<BootstrapSample>
    where
        R: Rng + ?Sized,
    {
        let probe = MedianConsistencyProbe::new(trials, self.resamples)
            .with_repeats(self.repeats)
            .with_warnings(false);

        let outcome = self
            .search
            .minimize(|x| x, |pr| probe.is_saturated(pr, &mut *rng), (0.0, 1.0))?;
        let boundary = outcome.x;

        if self.verbose {
            info!(trials, boundary, rounds = outcome.rounds, "boundary probability found");
        } else {
            debug!(trials, boundary, rounds = outcome.rounds, "boundary probability found");
        }

        let values = binomial_draws(trials, boundary, self.resamples, rng)?
            .into_iter()
            .map(|k| k as f64 / trials as f64)
            .collect();
        Ok(BootstrapSample::with_boundary(values, boundary))
    }

    /// Replicates for a saturated arm, reflecting through `1 - x` for 0% arms
    pub fn sample_arm<R>(&self, arm: Arm, rng: &mut R) -> Result<BootstrapSample>
    where
        R: Rng + ?Sized,
    {
        match arm.saturation() {
            Saturation::Full => self.sample_saturated(arm.total, rng),
            Saturation::Empty => Ok(self.sample_saturated(arm.total, rng)?.complement()),
            Saturation::Interior => Err(Error::InvalidInput(format!(
                "arm {}/{} is not saturated",
                arm.observed, arm.total
            ))),
        }
    }
}
