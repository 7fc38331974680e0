//! Integration tests for the confusion-table model

use approx::assert_relative_eq;
use boot_lr_core::{
    confusion_statistics_batch, math, ConfusionCounts, ConfusionStats, Error, Saturation,
};

const EPSILON: f64 = 1e-12;

#[test]
fn test_reference_table() {
    let stats = ConfusionCounts::new(80, 100, 60, 100).unwrap().statistics();
    assert_relative_eq!(stats.sensitivity, 0.8, epsilon = EPSILON);
    assert_relative_eq!(stats.specificity, 0.6, epsilon = EPSILON);
    assert_relative_eq!(stats.pos_lr, 2.0, epsilon = EPSILON);
    assert_relative_eq!(stats.neg_lr, 1.0 / 3.0, epsilon = EPSILON);
}

#[test]
fn test_saturated_arms_give_degenerate_ratios() {
    let counts = ConfusionCounts::new(100, 100, 60, 100).unwrap();
    let stats = counts.statistics();
    assert_eq!(stats.neg_lr, 0.0);
    assert_eq!(counts.sensitivity_arm().saturation(), Saturation::Full);
    assert_eq!(counts.specificity_arm().saturation(), Saturation::Interior);

    let stats = ConfusionStats::from_rates(0.9, 1.0);
    assert!(stats.pos_lr.is_infinite());
}

#[test]
fn test_batch_matches_scalar() {
    let batch = confusion_statistics_batch(&[80, 100, 0], &[100, 100, 50], &[60, 60, 30], &[100, 100, 50])
        .unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(batch[0], ConfusionCounts::new(80, 100, 60, 100).unwrap().statistics());
    assert_eq!(batch[2].pos_lr, 0.0);
}

#[test]
fn test_batch_rejects_bad_rows() {
    assert!(matches!(
        confusion_statistics_batch(&[1, 2], &[5], &[1, 1], &[2, 2]),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        confusion_statistics_batch(&[6], &[5], &[1], &[2]),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_normal_quantile_symmetry() {
    let z = math::distributions::normal::ppf(0.975);
    assert_relative_eq!(z, 1.959963984540054, epsilon = 1e-9);
    assert_relative_eq!(math::distributions::normal::cdf(-z), 0.025, epsilon = 1e-9);
}
