//! Robustness of a subtype call to additive measurement noise.
//!
//! `consistency` perturbs every panel value with uniform noise in `[-alpha, alpha]` and counts how
//! often the call survives. `tolerance` looks for the largest `alpha` whose consistency stays at
//! or above the threshold.

use rand::Rng;
use thiserror::Error;

use crate::model::classifier::NearestCentroid;
use crate::model::params::{ClassifyParams, ToleranceSearch};

/// Largest grid a tolerance scan may evaluate.
pub const MAX_SCAN_POINTS: usize = 100_000;
/// Upper bound for a configured noise amplitude, in log2 expression units.
pub const MAX_NOISE_ALPHA: f64 = 1e6;
/// Lower bound for the configured search precision and scan step.
pub const MIN_SEARCH_STEP: f64 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum StabilityError {
    #[error("noise amplitude {0} cannot be sampled")]
    NoiseOutOfRange(f64),
    #[error("tolerance scan up to {upper} in steps of {step} exceeds {max} points", max = MAX_SCAN_POINTS)]
    GridTooLarge { upper: f64, step: f64 },
}

pub fn consistency<R: Rng>(
    classifier: &NearestCentroid,
    values: &[f64],
    reference: usize,
    alpha: f64,
    trials: usize,
    rng: &mut R,
) -> Result<f64, StabilityError> {
    if alpha <= 0.0 || trials == 0 {
        return Ok(1.0);
    }
    // the sampling range is 2 * alpha wide
    if !(2.0 * alpha).is_finite() {
        return Err(StabilityError::NoiseOutOfRange(alpha));
    }
    let mut noisy = vec![0.0; values.len()];
    let mut agree = 0usize;
    for _ in 0..trials {
        for (slot, v) in noisy.iter_mut().zip(values.iter()) {
            *slot = v + rng.gen_range(-alpha..=alpha);
        }
        if classifier.classify(&noisy) == Some(reference) {
            agree += 1;
        }
    }
    Ok(agree as f64 / trials as f64)
}

pub fn tolerance<R: Rng>(
    classifier: &NearestCentroid,
    values: &[f64],
    reference: usize,
    params: &ClassifyParams,
    rng: &mut R,
) -> Result<f64, StabilityError> {
    let upper = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(upper > 0.0) {
        return Ok(0.0);
    }
    match params.search {
        ToleranceSearch::Bisect => bisect(classifier, values, reference, upper, params, rng),
        ToleranceSearch::Scan => scan(classifier, values, reference, upper, params, rng),
    }
}

/// Assumes consistency does not increase with alpha.
fn bisect<R: Rng>(
    classifier: &NearestCentroid,
    values: &[f64],
    reference: usize,
    upper: f64,
    params: &ClassifyParams,
    rng: &mut R,
) -> Result<f64, StabilityError> {
    let passes = |alpha: f64, rng: &mut R| {
        consistency(classifier, values, reference, alpha, params.trials, rng)
            .map(|c| c >= params.threshold)
    };
    if passes(upper, rng)? {
        return Ok(upper);
    }

    let precision = params.precision.max(f64::EPSILON);
    let mut lo = 0.0;
    let mut hi = upper;
    while hi - lo > precision {
        let mid = 0.5 * (lo + hi);
        // interval can no longer be split at this magnitude
        if mid <= lo || mid >= hi {
            break;
        }
        if passes(mid, rng)? {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

/// Grid walk with a three-point moving average; stops at the first smoothed drop below the
/// threshold.
fn scan<R: Rng>(
    classifier: &NearestCentroid,
    values: &[f64],
    reference: usize,
    upper: f64,
    params: &ClassifyParams,
    rng: &mut R,
) -> Result<f64, StabilityError> {
    let step = params.scan_step.max(params.precision).max(f64::EPSILON);
    let span = (upper / step).floor();
    if !(span < MAX_SCAN_POINTS as f64) {
        return Err(StabilityError::GridTooLarge { upper, step });
    }
    let n_points = span as usize + 1;
    let grid: Vec<f64> = (0..n_points).map(|i| i as f64 * step).collect();
    let raw = grid
        .iter()
        .map(|&alpha| consistency(classifier, values, reference, alpha, params.trials, rng))
        .collect::<Result<Vec<f64>, _>>()?;

    let mut best = 0.0;
    for i in 0..raw.len() {
        let lo = i.saturating_sub(1);
        let hi = (i + 1).min(raw.len() - 1);
        let window = &raw[lo..=hi];
        let smoothed = window.iter().sum::<f64>() / window.len() as f64;
        if smoothed < params.threshold {
            break;
        }
        best = grid[i];
    }
    Ok(best)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/stability.rs"]
mod tests;
