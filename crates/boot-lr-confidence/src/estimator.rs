//! Likelihood-ratio estimation from a confusion table
//!
//! One estimation attempt: bootstrap each arm (ordinarily, or through the
//! boundary sampler when the arm is saturated), combine the arms into LR+
//! and LR- replicates, and compute BCa intervals. Reported point estimates
//! use the exact observed rates; the intervals are centered on the proxy
//! rates, where a saturated arm's rate is replaced by its boundary
//! probability.

use crate::{
    bootstrap::{proportion_bootstrap, BootstrapMethod, BootstrapSample},
    bootstrap_methods::BCaBootstrap,
    boundary::BoundaryBootstrapSampler,
    consistency::DEFAULT_CONSISTENCY_REPEATS,
    grid_search::SearchParameters,
    types::{ConfidenceInterval, ConfidenceLevel},
};
use boot_lr_core::{Arm, ConfusionCounts, ConfusionStats, Error, Result, Saturation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

/// Replicate count below which results are considered unstable
pub const RECOMMENDED_MIN_RESAMPLES: usize = 50_000;

/// Sensitivity and specificity as used for the intervals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmStatistics {
    pub sensitivity: f64,
    pub specificity: f64,
}

/// Outcome of a likelihood-ratio test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LRTestResult {
    /// LR+ from the observed rates
    pub pos_lr: f64,
    pub pos_lr_ci: ConfidenceInterval,
    /// LR- from the observed rates
    pub neg_lr: f64,
    pub neg_lr_ci: ConfidenceInterval,
    pub inputs: ConfusionCounts,
    /// Boundary-adjusted sensitivity and specificity
    pub statistics: ArmStatistics,
    /// Attempts the retry wrapper needed
    pub attempts: usize,
}

impl fmt::Display for LRTestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = self.pos_lr_ci.confidence_level * 100.0;
        writeln!(f, "Likelihood ratio test of a 2x2 diagnostic table")?;
        writeln!(
            f,
            "  True positives:  {} of {} disease positive",
            self.inputs.true_positive(),
            self.inputs.total_disease_positive()
        )?;
        writeln!(
            f,
            "  True negatives:  {} of {} disease negative",
            self.inputs.true_negative(),
            self.inputs.total_disease_negative()
        )?;
        writeln!(
            f,
            "  Positive LR: {:.3} ({:.0}% CI {:.3} - {:.3})",
            self.pos_lr, level, self.pos_lr_ci.lower, self.pos_lr_ci.upper
        )?;
        writeln!(
            f,
            "  Negative LR: {:.3} ({:.0}% CI {:.3} - {:.3})",
            self.neg_lr, level, self.neg_lr_ci.lower, self.neg_lr_ci.upper
        )?;
        write!(
            f,
            "  Intervals come from BCa bootstrapping; bounds vary slightly between runs. \
             Increase the number of replicates for more stable bounds."
        )
    }
}

/// Elementwise `numerator / denominator` over paired replicates
///
/// A zero denominator with a positive numerator gives `+inf`, which the
/// interval methods rank like any other value. Pairs where both are zero
/// have no defined ratio and are dropped.
fn ratio_replicates<I>(pairs: I) -> Result<Vec<f64>>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut dropped = 0usize;
    let ratios: Vec<f64> = pairs
        .into_iter()
        .filter_map(|(numerator, denominator)| {
            if numerator == 0.0 && denominator == 0.0 {
                dropped += 1;
                None
            } else {
                Some(numerator / denominator)
            }
        })
        .collect();
    if dropped > 0 {
        debug!(dropped, kept = ratios.len(), "dropped undefined 0/0 ratio replicates");
    }
    if ratios.is_empty() {
        return Err(Error::InsufficientData {
            expected: 1,
            actual: 0,
        });
    }
    Ok(ratios)
}

/// Interval for LR- = (1 - sensitivity) / specificity
///
/// If any specificity replicate is 0 the interval is computed for the
/// reciprocal and inverted back.
pub fn neg_lr_interval<M: BootstrapMethod>(
    sensitivity: &[f64],
    specificity: &[f64],
    center: f64,
    method: &M,
    confidence_level: f64,
) -> Result<ConfidenceInterval> {
    check_paired(sensitivity, specificity)?;
    let pairs = sensitivity.iter().zip(specificity);
    if specificity.iter().any(|&sp| sp == 0.0) {
        debug!("Specificity replicate of 0, inverting LR-");
        let inverted = ratio_replicates(pairs.map(|(&se, &sp)| (sp, 1.0 - se)))?;
        let ci = method.calculate_interval(&inverted, 1.0 / center, confidence_level)?;
        return Ok(ci.reciprocal(center));
    }
    let ratio = ratio_replicates(pairs.map(|(&se, &sp)| (1.0 - se, sp)))?;
    method.calculate_interval(&ratio, center, confidence_level)
}

/// Interval for LR+ = sensitivity / (1 - specificity)
///
/// If any specificity replicate is 1 the interval is computed for the
/// reciprocal and inverted back.
pub fn pos_lr_interval<M: BootstrapMethod>(
    sensitivity: &[f64],
    specificity: &[f64],
    center: f64,
    method: &M,
    confidence_level: f64,
) -> Result<ConfidenceInterval> {
    check_paired(sensitivity, specificity)?;
    let pairs = sensitivity.iter().zip(specificity);
    if specificity.iter().any(|&sp| sp == 1.0) {
        debug!("Specificity replicate of 1, inverting LR+");
        let inverted = ratio_replicates(pairs.map(|(&se, &sp)| (1.0 - sp, se)))?;
        let ci = method.calculate_interval(&inverted, 1.0 / center, confidence_level)?;
        return Ok(ci.reciprocal(center));
    }
    let ratio = ratio_replicates(pairs.map(|(&se, &sp)| (se, 1.0 - sp)))?;
    method.calculate_interval(&ratio, center, confidence_level)
}

fn check_paired(sensitivity: &[f64], specificity: &[f64]) -> Result<()> {
    if sensitivity.len() != specificity.len() {
        return Err(Error::InvalidInput(format!(
            "Size mismatch in paired replicates: expected {}, got {}",
            sensitivity.len(),
            specificity.len()
        )));
    }
    if sensitivity.is_empty() {
        return Err(Error::empty_input("likelihood ratio replicates"));
    }
    Ok(())
}

/// A single estimation attempt with fixed search parameters
#[derive(Debug, Clone)]
pub struct LikelihoodRatioEstimator<M = BCaBootstrap> {
    method: M,
    resamples: usize,
    search: SearchParameters,
    confidence_level: ConfidenceLevel,
    repeats: usize,
    verbose: bool,
}

impl LikelihoodRatioEstimator<BCaBootstrap> {
    pub fn new(resamples: usize, search: SearchParameters) -> Self {
        Self::with_method(BCaBootstrap, resamples, search)
    }
}

impl<M: BootstrapMethod> LikelihoodRatioEstimator<M> {
    pub fn with_method(method: M, resamples: usize, search: SearchParameters) -> Self {
        Self {
            method,
            resamples,
            search,
            confidence_level: ConfidenceLevel::default(),
            repeats: DEFAULT_CONSISTENCY_REPEATS,
            verbose: false,
        }
    }

    pub fn with_confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn arm_sample<R>(&self, arm: Arm, rng: &mut R) -> Result<BootstrapSample>
    where
        R: Rng + ?Sized,
    {
        match arm.saturation() {
            Saturation::Interior => proportion_bootstrap(arm, self.resamples, rng),
            Saturation::Full | Saturation::Empty => {
                BoundaryBootstrapSampler::new(self.search, self.resamples)?
                    .with_repeats(self.repeats)
                    .with_verbose(self.verbose)
                    .sample_arm(arm, rng)
            }
        }
    }

    /// Run one attempt
    #[instrument(skip(self, rng), fields(resamples = self.resamples, method = self.method.name()))]
    pub fn estimate<R>(&self, counts: &ConfusionCounts, rng: &mut R) -> Result<LRTestResult>
    where
        R: Rng + ?Sized,
    {
        if self.resamples == 0 {
            return Err(Error::InvalidParameter("resamples must be positive".to_string()));
        }
        if self.resamples < RECOMMENDED_MIN_RESAMPLES {
            warn!(
                "{} bootstrap replicates is below the recommended {}; intervals may be unstable",
                self.resamples, RECOMMENDED_MIN_RESAMPLES
            );
        }

        let exact = counts.statistics();
        let sensitivity = self.arm_sample(counts.sensitivity_arm(), rng)?;
        let specificity = self.arm_sample(counts.specificity_arm(), rng)?;

        let proxy = ConfusionStats::from_rates(
            sensitivity.boundary_probability().unwrap_or(exact.sensitivity),
            specificity.boundary_probability().unwrap_or(exact.specificity),
        );
        debug!(?exact, ?proxy, "point statistics");

        let level = self.confidence_level.value();
        let pos_lr_ci = pos_lr_interval(
            sensitivity.values(),
            specificity.values(),
            proxy.pos_lr,
            &self.method,
            level,
        )?;
        let neg_lr_ci = neg_lr_interval(
            sensitivity.values(),
            specificity.values(),
            proxy.neg_lr,
            &self.method,
            level,
        )?;

        Ok(LRTestResult {
            pos_lr: exact.pos_lr,
            pos_lr_ci,
            neg_lr: exact.neg_lr,
            neg_lr_ci,
            inputs: *counts,
            statistics: ArmStatistics {
                sensitivity: proxy.sensitivity,
                specificity: proxy.specificity,
            },
            attempts: 1,
        })
    }
}
