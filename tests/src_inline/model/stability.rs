use super::*;
use crate::centroids::defs::{Centroid, CentroidSet};
use crate::model::seed::shared_rng;

fn pair_classifier() -> NearestCentroid {
    NearestCentroid::new(&CentroidSet {
        genes: vec!["g1".to_string(), "g2".to_string()],
        centroids: vec![
            Centroid {
                label: "A".to_string(),
                weights: vec![1.0, 2.0],
            },
            Centroid {
                label: "B".to_string(),
                weights: vec![2.0, 1.0],
            },
        ],
    })
}

fn classifier() -> NearestCentroid {
    NearestCentroid::new(&CentroidSet {
        genes: vec!["g1".to_string(), "g2".to_string(), "g3".to_string()],
        centroids: vec![
            Centroid {
                label: "A".to_string(),
                weights: vec![1.0, 2.0, 3.0],
            },
            Centroid {
                label: "B".to_string(),
                weights: vec![3.0, 2.0, 1.0],
            },
        ],
    })
}

#[test]
fn zero_noise_is_fully_consistent() {
    let c = classifier();
    let mut rng = shared_rng(1);
    let r = consistency(&c, &[0.1, 0.5, 0.9], 0, 0.0, 10, &mut rng).expect("consistency");
    assert_eq!(r, 1.0);
    let r = consistency(&c, &[0.1, 0.5, 0.9], 0, 1.0, 0, &mut rng).expect("consistency");
    assert_eq!(r, 1.0);
}

#[test]
fn noise_below_the_gap_never_flips_the_call() {
    let c = classifier();
    let mut rng = shared_rng(1);
    let r = consistency(&c, &[0.0, 10.0, 20.0], 0, 0.5, 50, &mut rng).expect("consistency");
    assert_eq!(r, 1.0);
    let r = consistency(&c, &[0.0, 10.0, 20.0], 1, 0.5, 50, &mut rng).expect("consistency");
    assert_eq!(r, 0.0);
}

#[test]
fn consistency_is_deterministic_for_a_seed() {
    let c = classifier();
    let values = [0.0, 1.0, 1.5];
    let a = consistency(&c, &values, 0, 2.0, 100, &mut shared_rng(9)).expect("consistency");
    let b = consistency(&c, &values, 0, 2.0, 100, &mut shared_rng(9)).expect("consistency");
    assert_eq!(a, b);
    assert!((0.0..=1.0).contains(&a));
}

#[test]
fn bisect_finds_the_rank_gap() {
    let c = classifier();
    let params = ClassifyParams::default();
    let values = [0.0, 10.0, 20.0];
    let tol = tolerance(&c, &values, 0, &params, &mut shared_rng(3)).expect("tolerance");
    assert!(tol >= 4.9, "tolerance {tol}");
    assert!(tol <= 20.0);
}

#[test]
fn scan_finds_the_rank_gap() {
    let c = classifier();
    let params = ClassifyParams {
        search: ToleranceSearch::Scan,
        ..ClassifyParams::default()
    };
    let values = [0.0, 10.0, 20.0];
    let tol = tolerance(&c, &values, 0, &params, &mut shared_rng(3)).expect("tolerance");
    assert!(tol >= 4.85, "tolerance {tol}");
    assert!(tol <= 20.0);
}

#[test]
fn non_positive_profile_has_zero_tolerance() {
    let c = classifier();
    let params = ClassifyParams::default();
    let tol = tolerance(&c, &[-3.0, -2.0, -1.0], 0, &params, &mut shared_rng(3))
        .expect("tolerance");
    assert_eq!(tol, 0.0);
}

// For values [0, 1] the call flips once u1 - u2 > 1, so consistency at alpha >= 0.5 is
// 1 - (2 - 1/alpha)^2 / 8 and crosses 0.95 near alpha = 0.731.
#[test]
fn tolerance_separates_passing_and_failing_noise() {
    let c = pair_classifier();
    let values = [0.0, 1.0];
    for search in [ToleranceSearch::Bisect, ToleranceSearch::Scan] {
        let params = ClassifyParams {
            trials: 2000,
            search,
            ..ClassifyParams::default()
        };
        let tol = tolerance(&c, &values, 0, &params, &mut shared_rng(5)).expect("tolerance");
        assert!((0.6..=0.86).contains(&tol), "{search:?} tolerance {tol}");

        let below = consistency(&c, &values, 0, tol - 0.2, 2000, &mut shared_rng(6))
            .expect("consistency");
        let above = consistency(&c, &values, 0, tol + 0.2, 2000, &mut shared_rng(7))
            .expect("consistency");
        assert!(below >= params.threshold, "{search:?} below {below}");
        assert!(above < params.threshold, "{search:?} above {above}");
    }
}

#[test]
fn unsampleable_noise_is_an_error() {
    let c = classifier();
    let err = consistency(&c, &[0.0, 1.0, 2.0], 0, 1e308, 10, &mut shared_rng(1))
        .expect_err("range overflows");
    assert_eq!(err, StabilityError::NoiseOutOfRange(1e308));

    let err = consistency(&c, &[0.0, 1.0, 2.0], 0, f64::NAN, 10, &mut shared_rng(1))
        .expect_err("nan amplitude");
    assert!(matches!(err, StabilityError::NoiseOutOfRange(_)));
}

#[test]
fn oversized_scan_grid_is_an_error() {
    let c = classifier();
    let params = ClassifyParams {
        search: ToleranceSearch::Scan,
        scan_step: 1e-300,
        precision: 1e-300,
        ..ClassifyParams::default()
    };
    let err = tolerance(&c, &[0.0, 10.0, 20.0], 0, &params, &mut shared_rng(3))
        .expect_err("grid too large");
    assert!(matches!(err, StabilityError::GridTooLarge { .. }));
}

#[test]
fn bisect_terminates_below_float_resolution() {
    let c = classifier();
    let params = ClassifyParams {
        precision: 1e-300,
        ..ClassifyParams::default()
    };
    let tol =
        tolerance(&c, &[0.0, 10.0, 20.0], 0, &params, &mut shared_rng(3)).expect("tolerance");
    assert!(tol >= 4.9, "tolerance {tol}");
}
