//! Confusion-table model for a binary diagnostic test
//!
//! `ConfusionCounts` holds the four validated counts of a 2x2 table and
//! `ConfusionStats` the derived point statistics. Computation is pure: the
//! same counts always give the same statistics.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts from a 2x2 diagnostic-test table
///
/// Invariants: `true_positive <= total_disease_positive`,
/// `true_negative <= total_disease_negative`, and both totals are nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCounts")]
pub struct ConfusionCounts {
    true_positive: u64,
    total_disease_positive: u64,
    true_negative: u64,
    total_disease_negative: u64,
}

impl ConfusionCounts {
    /// Validate and construct a confusion table
    pub fn new(
        true_positive: u64,
        total_disease_positive: u64,
        true_negative: u64,
        total_disease_negative: u64,
    ) -> Result<Self> {
        if total_disease_positive == 0 {
            return Err(Error::InvalidInput(
                "total disease positives is zero, sensitivity is undefined".to_string(),
            ));
        }
        if total_disease_negative == 0 {
            return Err(Error::InvalidInput(
                "total disease negatives is zero, specificity is undefined".to_string(),
            ));
        }
        if true_positive > total_disease_positive {
            return Err(Error::InvalidInput(format!(
                "true positives ({true_positive}) exceed total disease positives ({total_disease_positive})"
            )));
        }
        if true_negative > total_disease_negative {
            return Err(Error::InvalidInput(format!(
                "true negatives ({true_negative}) exceed total disease negatives ({total_disease_negative})"
            )));
        }
        Ok(Self {
            true_positive,
            total_disease_positive,
            true_negative,
            total_disease_negative,
        })
    }

    pub fn true_positive(&self) -> u64 {
        self.true_positive
    }

    pub fn total_disease_positive(&self) -> u64 {
        self.total_disease_positive
    }

    pub fn true_negative(&self) -> u64 {
        self.true_negative
    }

    pub fn total_disease_negative(&self) -> u64 {
        self.total_disease_negative
    }

    /// The sensitivity arm as (observed, total)
    pub fn sensitivity_arm(&self) -> Arm {
        Arm::new(self.true_positive, self.total_disease_positive)
    }

    /// The specificity arm as (observed, total)
    pub fn specificity_arm(&self) -> Arm {
        Arm::new(self.true_negative, self.total_disease_negative)
    }

    /// Point statistics for this table
    pub fn statistics(&self) -> ConfusionStats {
        ConfusionStats::from_rates(
            self.true_positive as f64 / self.total_disease_positive as f64,
            self.true_negative as f64 / self.total_disease_negative as f64,
        )
    }
}

#[derive(Deserialize)]
struct RawCounts {
    true_positive: u64,
    total_disease_positive: u64,
    true_negative: u64,
    total_disease_negative: u64,
}

impl TryFrom<RawCounts> for ConfusionCounts {
    type Error = Error;

    fn try_from(raw: RawCounts) -> Result<Self> {
        Self::new(
            raw.true_positive,
            raw.total_disease_positive,
            raw.true_negative,
            raw.total_disease_negative,
        )
    }
}

impl fmt::Display for ConfusionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TP {}/{} disease positive, TN {}/{} disease negative",
            self.true_positive,
            self.total_disease_positive,
            self.true_negative,
            self.total_disease_negative
        )
    }
}

/// One arm of the table: successes out of a fixed number of trials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arm {
    pub observed: u64,
    pub total: u64,
}

/// How an arm sits relative to the boundary of [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saturation {
    /// Strictly between 0% and 100%
    Interior,
    /// Every trial succeeded
    Full,
    /// No trial succeeded
    Empty,
}

impl Arm {
    pub fn new(observed: u64, total: u64) -> Self {
        Self { observed, total }
    }

    pub fn rate(&self) -> f64 {
        self.observed as f64 / self.total as f64
    }

    pub fn saturation(&self) -> Saturation {
        if self.observed == self.total {
            Saturation::Full
        } else if self.observed == 0 {
            Saturation::Empty
        } else {
            Saturation::Interior
        }
    }

    /// The arm expanded into its 0/1 observations
    pub fn indicators(&self) -> Vec<f64> {
        let mut data = vec![1.0; self.observed as usize];
        data.resize(self.total as usize, 0.0);
        data
    }
}

/// Sensitivity, specificity and the two likelihood ratios
///
/// The ratios are infinite or NaN when specificity is exactly 0 or 1;
/// callers special-case those.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfusionStats {
    pub sensitivity: f64,
    pub specificity: f64,
    pub pos_lr: f64,
    pub neg_lr: f64,
}

impl ConfusionStats {
    /// Derive the likelihood ratios from a sensitivity/specificity pair
    pub fn from_rates(sensitivity: f64, specificity: f64) -> Self {
        Self {
            sensitivity,
            specificity,
            pos_lr: sensitivity / (1.0 - specificity),
            neg_lr: (1.0 - sensitivity) / specificity,
        }
    }

    pub fn from_counts(counts: &ConfusionCounts) -> Self {
        counts.statistics()
    }
}

/// Statistics for parallel arrays of counts
///
/// Every element is validated the same way `ConfusionCounts::new` does.
pub fn confusion_statistics_batch(
    true_positive: &[u64],
    total_disease_positive: &[u64],
    true_negative: &[u64],
    total_disease_negative: &[u64],
) -> Result<Vec<ConfusionStats>> {
    let n = true_positive.len();
    for (name, len) in [
        ("total disease positives", total_disease_positive.len()),
        ("true negatives", true_negative.len()),
        ("total disease negatives", total_disease_negative.len()),
    ] {
        if len != n {
            return Err(Error::InvalidInput(format!(
                "Size mismatch in {name}: expected {n}, got {len}"
            )));
        }
    }

    (0..n)
        .map(|i| {
            ConfusionCounts::new(
                true_positive[i],
                total_disease_positive[i],
                true_negative[i],
                total_disease_negative[i],
            )
            .map(|c| c.statistics())
        })
        .collect()
}
