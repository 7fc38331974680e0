use boot_lr::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_prelude_runs_full_pipeline() {
    init_tracing();
    let counts = ConfusionCounts::new(90, 100, 100, 100).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let result = LikelihoodRatioTest::new()
        .with_resamples(2_000)
        .with_verbose(true)
        .run_with_rng(&counts, &mut rng)
        .unwrap();

    assert!(result.pos_lr.is_infinite());
    assert!((result.neg_lr - 0.1).abs() < 1e-12);
    assert!(result.statistics.specificity < 1.0);
    assert!(result.neg_lr_ci.lower <= result.neg_lr_ci.upper);

    let report = result.to_string();
    assert!(report.contains("90 of 100"));
    assert!(report.contains("Negative LR"));
}

#[test]
fn test_percentile_method_through_facade() {
    let replicates: Vec<f64> = (1..=100).map(f64::from).collect();
    let ci = PercentileBootstrap
        .calculate_interval(&replicates, 50.0, 0.90)
        .unwrap();
    assert!(ci.lower < 50.0 && 50.0 < ci.upper);
    assert_eq!(BCaBootstrap.name(), "BCa Bootstrap");
}

#[test]
fn test_version_is_exposed() {
    assert!(!boot_lr::boot_lr_core::VERSION.is_empty());
}
