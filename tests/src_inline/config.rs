use super::*;
use std::fs;
use tempfile::tempdir;

use crate::model::params::{RngScope, ToleranceSearch};

#[test]
fn defaults_are_valid() {
    let config = Config::load(None).expect("default config");
    assert_eq!(config, Config::default());
    assert_eq!(config.classification.trials, 10);
    assert_eq!(config.classification.seed, 42);
    assert_eq!(config.normalization.prior, 0.5);
    assert_eq!(config.report.mds_top, 500);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subtype.toml");
    fs::write(
        &path,
        "[classification]\ntrials = 25\nsearch = \"scan\"\nrng_scope = \"shared\"\n\n[submit]\npartition = \"long\"\n",
    )
    .expect("write");
    let config = Config::load(Some(&path)).expect("load");
    assert_eq!(config.classification.trials, 25);
    assert_eq!(config.classification.search, ToleranceSearch::Scan);
    assert_eq!(config.classification.rng_scope, RngScope::Shared);
    assert_eq!(config.classification.threshold, 0.95);
    assert_eq!(config.submit.partition, "long");
    assert_eq!(config.submit.scheduler, "sbatch");
}

#[test]
fn unknown_key_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("subtype.toml");
    fs::write(&path, "[classification]\ntrails = 3\n").expect("write");
    assert!(matches!(Config::load(Some(&path)), Err(ConfigError::Toml(_))));
}

#[test]
fn invalid_values_name_their_key() {
    let mut config = Config::default();
    config.classification.trials = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { key: "classification.trials", .. })
    ));

    let mut config = Config::default();
    config.normalization.quantile = 1.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { key: "normalization.quantile", .. })
    ));

    let mut config = Config::default();
    config.classification.noise_alpha = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn noise_and_search_bounds_are_enforced() {
    let mut config = Config::default();
    config.classification.noise_alpha = 1e308;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { key: "classification.noise_alpha", .. })
    ));

    let mut config = Config::default();
    config.classification.scan_step = 1e-300;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { key: "classification.scan_step", .. })
    ));

    let mut config = Config::default();
    config.classification.precision = 1e-300;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { key: "classification.precision", .. })
    ));

    let mut config = Config::default();
    config.classification.noise_alpha = MAX_NOISE_ALPHA;
    config.classification.scan_step = MIN_SEARCH_STEP;
    config.classification.precision = MIN_SEARCH_STEP;
    assert!(config.validate().is_ok());
}
