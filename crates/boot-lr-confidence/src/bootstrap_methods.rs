//! Interval methods over bootstrap replicates
//!
//! Both methods only see the replicate vector and a center value; they never
//! resample, so the same replicates can be reused for LR+, LR- and their
//! reciprocals.

use crate::{bootstrap::BootstrapMethod, ConfidenceInterval};
use boot_lr_core::{
    math::{distributions::normal, quantile_sorted, sorted_copy},
    Error, Result,
};
use tracing::{debug, instrument};

/// Sorted copy of the replicates, rejecting empty input and NaN
///
/// Infinite replicates are kept: a ratio whose denominator resampled to
/// zero still has a well-defined rank.
fn sorted_replicates(replicates: &[f64]) -> Result<Vec<f64>> {
    if replicates.is_empty() {
        return Err(Error::InvalidInput("no bootstrap replicates".to_string()));
    }
    if replicates.iter().any(|x| x.is_nan()) {
        return Err(Error::non_finite("bootstrap replicates"));
    }
    sorted_copy(replicates)
}

/// Plain percentile interval: the `alpha/2` and `1 - alpha/2` quantiles
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBootstrap;

impl BootstrapMethod for PercentileBootstrap {
    fn calculate_interval(
        &self,
        replicates: &[f64],
        center: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        let sorted = sorted_replicates(replicates)?;
        let tail = (1.0 - confidence_level) / 2.0;
        Ok(ConfidenceInterval::new(
            quantile_sorted(&sorted, tail)?,
            quantile_sorted(&sorted, 1.0 - tail)?,
            center,
            confidence_level,
        ))
    }

    fn name(&self) -> &'static str {
        "Percentile Bootstrap"
    }
}

/// Bias-corrected and accelerated interval
///
/// `z0` comes from the share of replicates strictly below the center and
/// the acceleration from the skewness of the replicates, so no jackknife
/// over the raw data is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BCaBootstrap;

impl BCaBootstrap {
    /// `z0 = Φ⁻¹(#{x < center} / R)`, or 0 when that share is 0 or 1
    fn bias_correction(replicates: &[f64], center: f64) -> f64 {
        let below = replicates.iter().filter(|&&x| x < center).count();
        let share = below as f64 / replicates.len() as f64;
        debug!(below, share, "replicates below center");

        if share <= 0.0 || share >= 1.0 {
            0.0
        } else {
            normal::quantile(share)
        }
    }

    /// `a = Σd³ / (6 (Σd²)^1.5)` with `d = mean - x`
    ///
    /// Only finite replicates contribute; with none (or no spread) `a = 0`.
    fn acceleration(replicates: &[f64]) -> f64 {
        let finite: Vec<f64> = replicates.iter().copied().filter(|x| x.is_finite()).collect();
        if finite.is_empty() {
            return 0.0;
        }
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;
        let (sum_sq, sum_cube) = finite.iter().fold((0.0, 0.0), |(s2, s3), &x| {
            let d = mean - x;
            (s2 + d * d, s3 + d * d * d)
        });
        if sum_sq <= 0.0 {
            return 0.0;
        }
        sum_cube / (6.0 * sum_sq.powf(1.5))
    }

    /// Map a nominal normal quantile `z` through the BCa correction
    fn adjusted_level(z0: f64, a: f64, z: f64) -> f64 {
        let shifted = z0 + z;
        normal::cdf(z0 + shifted / (1.0 - a * shifted))
    }
}

impl BootstrapMethod for BCaBootstrap {
    #[instrument(skip(self, replicates), fields(replicates = replicates.len()))]
    fn calculate_interval(
        &self,
        replicates: &[f64],
        center: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        let sorted = sorted_replicates(replicates)?;
        if center.is_nan() {
            return Err(Error::InvalidParameter("BCa center is NaN".to_string()));
        }

        let z0 = Self::bias_correction(replicates, center);
        let a = Self::acceleration(replicates);
        let tail = (1.0 - confidence_level) / 2.0;
        let lower_level = Self::adjusted_level(z0, a, normal::quantile(tail));
        let upper_level = Self::adjusted_level(z0, a, normal::quantile(1.0 - tail));

        if !(lower_level.is_finite() && upper_level.is_finite()) {
            return Err(Error::Computation(format!(
                "BCa adjusted percentiles are undefined (z0={z0}, a={a})"
            )));
        }
        debug!(z0, a, lower_level, upper_level, "BCa adjusted percentiles");

        Ok(ConfidenceInterval::new(
            quantile_sorted(&sorted, lower_level.clamp(0.0, 1.0))?,
            quantile_sorted(&sorted, upper_level.clamp(0.0, 1.0))?,
            center,
            confidence_level,
        ))
    }

    fn name(&self) -> &'static str {
        "BCa Bootstrap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percentile_quantiles() {
        let replicates: Vec<f64> = (0..=100).map(f64::from).collect();
        let ci = PercentileBootstrap.calculate_interval(&replicates, 50.0, 0.90).unwrap();

        assert_relative_eq!(ci.lower, 5.0, epsilon = 1e-9);
        assert_relative_eq!(ci.upper, 95.0, epsilon = 1e-9);
        assert_eq!(ci.estimate, 50.0);
    }

    #[test]
    fn test_bca_roughly_symmetric_when_centered() {
        let replicates: Vec<f64> = (-50..=50).map(|i| 5.0 + f64::from(i) * 0.1).collect();
        let ci = BCaBootstrap.calculate_interval(&replicates, 5.0, 0.95).unwrap();

        assert_relative_eq!(5.0 - ci.lower, ci.upper - 5.0, epsilon = 0.5);
        assert!(ci.lower < ci.upper);
    }

    #[test]
    fn test_bca_close_to_percentile_without_skew() {
        let replicates: Vec<f64> = (-50..=50).map(f64::from).collect();
        let bca = BCaBootstrap.calculate_interval(&replicates, 0.0, 0.95).unwrap();
        let pct = PercentileBootstrap.calculate_interval(&replicates, 0.0, 0.95).unwrap();
        // 50 of 101 values lie below 0, so z0 is slightly negative
        assert!(bca.lower <= pct.lower + 1.0);
        assert!(bca.upper <= pct.upper + 1e-9);
        assert_relative_eq!(BCaBootstrap::acceleration(&replicates), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bca_is_deterministic() {
        let replicates = vec![0.1, 0.4, 0.2, 0.9, 0.3, 0.3, 0.7];
        let first = BCaBootstrap.calculate_interval(&replicates, 0.35, 0.95).unwrap();
        let second = BCaBootstrap.calculate_interval(&replicates, 0.35, 0.95).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bias_correction_guard() {
        let replicates = [2.0, 3.0, 4.0];
        assert_eq!(BCaBootstrap::bias_correction(&replicates, 1.0), 0.0);
        assert_eq!(BCaBootstrap::bias_correction(&replicates, 5.0), 0.0);
        assert!(BCaBootstrap::bias_correction(&replicates, 3.5) > 0.0);
    }

    #[test]
    fn test_skewed_replicates_are_accelerated() {
        let replicates: Vec<f64> = (1..=200).map(|i| (f64::from(i) / 40.0).exp()).collect();
        assert!(BCaBootstrap::acceleration(&replicates) != 0.0);
        let ci = BCaBootstrap.calculate_interval(&replicates, 20.0, 0.95).unwrap();
        assert!(ci.lower < ci.upper);
    }

    #[test]
    fn test_constant_replicates_collapse() {
        let replicates = vec![1.0; 50];
        let ci = BCaBootstrap.calculate_interval(&replicates, 1.0, 0.95).unwrap();
        assert_eq!((ci.lower, ci.upper), (1.0, 1.0));
    }

    #[test]
    fn test_rejects_empty_and_nan() {
        assert!(BCaBootstrap.calculate_interval(&[], 0.0, 0.95).is_err());
        assert!(BCaBootstrap.calculate_interval(&[1.0, f64::NAN], 1.0, 0.95).is_err());
        assert!(BCaBootstrap.calculate_interval(&[1.0, 2.0], f64::NAN, 0.95).is_err());
        assert!(PercentileBootstrap.calculate_interval(&[1.0, f64::NAN], 1.0, 0.95).is_err());
    }

    #[test]
    fn test_infinite_replicates_are_ranked() {
        // A handful of ratios with a zero denominator among 200 finite ones
        let mut replicates: Vec<f64> = (1..=200).map(|i| f64::from(i) / 100.0).collect();
        replicates.extend([f64::INFINITY; 3]);
        let ci = BCaBootstrap.calculate_interval(&replicates, 1.0, 0.95).unwrap();
        assert!(ci.is_finite(), "{ci}");
        assert!(ci.lower < ci.upper);
        assert!(BCaBootstrap::acceleration(&replicates).is_finite());

        // Most of the mass at infinity pushes the upper bound there
        let mut heavy = vec![f64::INFINITY; 60];
        heavy.extend((1..=40).map(|i| f64::from(i) / 10.0));
        let ci = BCaBootstrap.calculate_interval(&heavy, 2.0, 0.95).unwrap();
        assert!(ci.upper.is_infinite());
        assert!(ci.lower <= ci.upper);
    }

    #[test]
    fn test_all_infinite_has_zero_acceleration() {
        assert_eq!(BCaBootstrap::acceleration(&[f64::INFINITY; 4]), 0.0);
    }
}
