//! Interval and confidence-level types

use boot_lr_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounds of a likelihood-ratio interval plus the value it is centered on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Center value handed to the interval method
    pub estimate: f64,
    /// Nominal coverage, e.g. 0.95
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    pub fn new(lower: f64, upper: f64, estimate: f64, confidence_level: f64) -> Self {
        Self {
            lower,
            upper,
            estimate,
            confidence_level,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    /// Both bounds are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// Swap the bounds if `lower > upper`
    pub fn ordered(self) -> Self {
        if self.lower <= self.upper {
            return self;
        }
        Self {
            lower: self.upper,
            upper: self.lower,
            ..self
        }
    }

    /// Map an interval for `1/θ` back to an interval for `θ`
    ///
    /// Inversion reverses order, so the bounds swap. A zero bound maps to
    /// infinity.
    pub fn reciprocal(self, estimate: f64) -> Self {
        Self::new(1.0 / self.upper, 1.0 / self.lower, estimate, self.confidence_level).ordered()
    }
}

impl fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} [{:.3}, {:.3}] ({})",
            self.estimate,
            self.lower,
            self.upper,
            ConfidenceLevel(self.confidence_level)
        )
    }
}

/// Two-sided coverage in the open interval (0, 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    pub const NINETY: Self = Self(0.90);
    pub const NINETY_FIVE: Self = Self(0.95);
    pub const NINETY_NINE: Self = Self(0.99);

    pub fn new(level: f64) -> Result<Self> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(Error::InvalidParameter(format!(
                "Confidence level {level} must be in (0, 1)"
            )))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Rounded to 0.1%
        write!(f, "{}% CI", (self.0 * 1000.0).round() / 10.0)
    }
}
