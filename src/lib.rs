//! # boot-lr
//!
//! Bootstrap confidence intervals for the likelihood ratios of a binary
//! diagnostic test, including tables where sensitivity or specificity is
//! exactly 0% or 100%.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`boot_lr_core`]: confusion counts, point statistics, errors and math
//!   helpers
//! - [`boot_lr_confidence`]: bootstrap samplers, BCa intervals and the
//!   likelihood-ratio test itself
//!
//! # Example
//!
//! ```rust,no_run
//! use boot_lr::prelude::*;
//!
//! let counts = ConfusionCounts::new(100, 100, 60, 100)?;
//! let result = LikelihoodRatioTest::new().with_seed(42).run(&counts)?;
//! println!("{result}");
//! # Ok::<(), boot_lr::Error>(())
//! ```

pub use boot_lr_confidence;
pub use boot_lr_core;

pub use boot_lr_confidence::{
    estimate_likelihood_ratio, ConfidenceInterval, ConfidenceLevel, LRTestResult,
    LikelihoodRatioTest, SearchParameters,
};
pub use boot_lr_core::{ConfusionCounts, ConfusionStats, Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use boot_lr_confidence::{
        estimate_likelihood_ratio, BCaBootstrap, BootstrapMethod, ConfidenceInterval,
        ConfidenceLevel, LRTestResult, LikelihoodRatioTest, PercentileBootstrap,
        SearchParameters,
    };
    pub use boot_lr_core::prelude::*;
}
