//! Mathematical utilities for bootstrapped likelihood ratios
//!
//! Basic numeric helpers shared by the interval code: the standard normal
//! distribution and order statistics of bootstrap samples.

use crate::{Error, Result};

/// Distribution-related mathematical functions
pub mod distributions {
    /// Standard normal distribution utilities
    pub mod normal {
        use statrs::function::erf::{erfc, erfc_inv};
        use std::f64::consts::SQRT_2;

        /// Cumulative distribution function of the standard normal distribution
        pub fn cdf(x: f64) -> f64 {
            0.5 * erfc(-x / SQRT_2)
        }

        /// Inverse CDF (quantile function) of the standard normal distribution
        ///
        /// Returns -inf at 0 and +inf at 1.
        pub fn ppf(p: f64) -> f64 {
            if p <= 0.0 {
                return f64::NEG_INFINITY;
            }
            if p >= 1.0 {
                return f64::INFINITY;
            }
            -SQRT_2 * erfc_inv(2.0 * p)
        }

        /// Alias for ppf (percent point function) that matches common naming
        #[inline]
        pub fn quantile(p: f64) -> f64 {
            ppf(p)
        }

    }
}

/// Arithmetic mean; errors on an empty slice
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::empty_input("mean"));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample median of integer draws, averaging the two middle values for even lengths
///
/// Reorders `data` in place.
pub fn median_u64(data: &mut [u64]) -> Result<f64> {
    let n = data.len();
    if n == 0 {
        return Err(Error::empty_input("median"));
    }
    let mid = n / 2;
    let (below, &mut upper, _) = data.select_nth_unstable(mid);
    if n % 2 == 1 {
        return Ok(upper as f64);
    }
    // Largest element of the lower partition is the other middle value
    let lower = below.iter().copied().max().unwrap_or(upper);
    Ok((lower as f64 + upper as f64) / 2.0)
}

/// Sample quantile with linear interpolation between order statistics
/// (Hyndman-Fan type 7). `sorted` must be in ascending order and may hold
/// infinities; those are returned as-is instead of interpolated.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(Error::empty_input("quantile"));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::invalid_probability(p));
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    let (a, b) = (sorted[lo], sorted[hi]);
    if lo == hi || frac == 0.0 || a == b {
        return Ok(a);
    }
    // Interpolating toward an infinite order statistic yields that infinity
    if a.is_infinite() {
        return Ok(a);
    }
    if b.is_infinite() {
        return Ok(b);
    }
    Ok(a + frac * (b - a))
}

/// Copy and sort a sample, rejecting NaN
pub fn sorted_copy(data: &[f64]) -> Result<Vec<f64>> {
    if data.iter().any(|x| x.is_nan()) {
        return Err(Error::non_finite("sample"));
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(sorted)
}
