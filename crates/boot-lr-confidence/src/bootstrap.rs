//! Bootstrap resampling primitives
//!
//! This module provides:
//! - The [`BootstrapMethod`] trait that turns replicates into an interval
//! - [`BootstrapSample`], a replicate vector optionally tagged with the
//!   boundary probability it was drawn from
//! - Ordinary resampling with replacement and binomial draws

use crate::ConfidenceInterval;
use boot_lr_core::{math, Arm, Error, Result};
use rand::Rng;
use rand_distr::{Binomial, Distribution};
use tracing::debug;

/// Turns a replicate vector and its center value into an interval
///
/// Implemented by [`BCaBootstrap`](crate::BCaBootstrap) and
/// [`PercentileBootstrap`](crate::PercentileBootstrap); the estimator is
/// generic over it.
pub trait BootstrapMethod: Clone + Send + Sync {
    fn calculate_interval(
        &self,
        replicates: &[f64],
        center: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval>;

    /// Short label used in spans and logs
    fn name(&self) -> &'static str;
}

/// Replicates of a resampled proportion
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapSample {
    values: Vec<f64>,
    boundary_probability: Option<f64>,
}

impl BootstrapSample {
    /// Replicates from ordinary resampling
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            boundary_probability: None,
        }
    }

    /// Replicates drawn at a discovered boundary probability
    pub fn with_boundary(values: Vec<f64>, boundary_probability: f64) -> Self {
        Self {
            values,
            boundary_probability: Some(boundary_probability),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The boundary probability, when the sample came from the boundary sampler
    pub fn boundary_probability(&self) -> Option<f64> {
        self.boundary_probability
    }

    /// Reflect every replicate (and the boundary probability) through `1 - x`
    pub fn complement(self) -> Self {
        Self {
            values: self.values.into_iter().map(|x| 1.0 - x).collect(),
            boundary_probability: self.boundary_probability.map(|p| 1.0 - p),
        }
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Resample `data` with replacement `n_resamples` times and apply `statistic`
///
/// The resample buffer is reused across iterations.
pub fn resample_statistic<R, F>(
    data: &[f64],
    statistic: F,
    n_resamples: usize,
    rng: &mut R,
) -> Result<Vec<f64>>
where
    R: Rng + ?Sized,
    F: Fn(&[f64]) -> Result<f64>,
{
    if data.is_empty() {
        return Err(Error::empty_input("resample"));
    }
    let n = data.len();
    let mut buffer = vec![0.0; n];

    (0..n_resamples)
        .map(|_| {
            for slot in buffer.iter_mut() {
                *slot = data[rng.gen_range(0..n)];
            }
            statistic(&buffer)
        })
        .collect()
}

/// `count` independent draws from Binomial(trials, p)
pub fn binomial_draws<R>(trials: u64, p: f64, count: usize, rng: &mut R) -> Result<Vec<u64>>
where
    R: Rng + ?Sized,
{
    let binomial = Binomial::new(trials, p)
        .map_err(|e| Error::InvalidParameter(format!("Binomial({trials}, {p}): {e:?}")))?;
    Ok((0..count).map(|_| binomial.sample(rng)).collect())
}

/// Ordinary bootstrap of an arm's 0/1 observations, using the mean as the statistic
pub fn proportion_bootstrap<R>(arm: Arm, n_resamples: usize, rng: &mut R) -> Result<BootstrapSample>
where
    R: Rng + ?Sized,
{
    debug!(
        "Resampling arm {}/{} with {} replicates",
        arm.observed, arm.total, n_resamples
    );
    let values = resample_statistic(&arm.indicators(), math::mean, n_resamples, rng)?;
    Ok(BootstrapSample::new(values))
}
