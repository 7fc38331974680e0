//! Core types for bootstrapped diagnostic likelihood ratios
//!
//! This crate holds the pieces every other boot-lr crate builds on:
//!
//! - **Error taxonomy**: a single [`Error`] enum whose variants tell fatal
//!   input problems apart from recoverable convergence failures
//! - **Confusion model**: validated 2x2 counts and their point statistics
//!   (sensitivity, specificity, LR+ and LR-)
//! - **Math**: standard normal CDF/quantile and order statistics
//!
//! # Example
//!
//! ```rust
//! use boot_lr_core::ConfusionCounts;
//!
//! let counts = ConfusionCounts::new(80, 100, 60, 100).unwrap();
//! let stats = counts.statistics();
//! assert!((stats.pos_lr - 2.0).abs() < 1e-12);
//! ```

pub mod confusion;
pub mod error;
pub mod math;

// Re-export core types
pub use confusion::{
    confusion_statistics_batch, Arm, ConfusionCounts, ConfusionStats, Saturation,
};
pub use error::{Error, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Arm, ConfusionCounts, ConfusionStats, Error, Result, Saturation};
}
