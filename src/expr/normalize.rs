use serde::{Deserialize, Serialize};

use crate::expr::matrix::CountMatrix;
use crate::math::stats::quantile_sorted;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Normalization {
    /// Minimum count a gene must reach in `min_samples` samples to be kept.
    pub min_count: u64,
    pub min_samples: usize,
    /// Quantile above which counts enter the scaling sum.
    pub quantile: f64,
    /// Offset added to every count before the logarithm.
    pub prior: f64,
    pub scale: f64,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            min_count: 10,
            min_samples: 1,
            quantile: 0.75,
            prior: 0.5,
            scale: 1e6,
        }
    }
}

/// Indices of genes passing the low-count filter, in matrix order.
pub fn filter_genes(matrix: &CountMatrix, norm: &Normalization) -> Vec<usize> {
    let needed = norm.min_samples.max(1);
    (0..matrix.n_genes())
        .filter(|&g| {
            let hits = matrix
                .counts
                .iter()
                .filter(|sample| sample[g] >= norm.min_count)
                .count();
            hits >= needed
        })
        .collect()
}

/// Multiplier turning one sample's raw counts into counts per million.
///
/// The reference library is the summed count of kept genes strictly above the sample's
/// upper quantile, falling back to the full kept library when that sum is zero.
pub fn scale_factor(counts: &[u64], kept: &[usize], norm: &Normalization) -> f64 {
    let mut values: Vec<f64> = kept.iter().map(|&g| counts[g] as f64).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let threshold = quantile_sorted(&values, norm.quantile);

    let mut reference: f64 = if threshold.is_nan() {
        0.0
    } else {
        values.iter().filter(|v| **v > threshold).sum()
    };
    if reference <= 0.0 {
        reference = values.iter().sum();
    }
    norm.scale / (reference + 1.0)
}

pub fn lcpm(count: u64, scale_factor: f64, prior: f64) -> f64 {
    ((count as f64 + prior) * scale_factor).log2()
}

#[cfg(test)]
#[path = "../../tests/src_inline/expr/normalize.rs"]
mod tests;
