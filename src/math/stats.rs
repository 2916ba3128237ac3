//! Quantiles and missing-aware aggregates.
//!
//! Note: functions taking `&mut` may reorder the input slice.

use serde::Serialize;

pub fn sort_finite(values: &mut Vec<f64>) {
    values.retain(|v| v.is_finite());
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}

/// Linear-interpolation quantile over sorted values (R `quantile(type = 7)`).
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Mean over present values; `None` when nothing is present.
pub fn mean_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values.into_iter().flatten() {
        if v.is_finite() {
            sum += v;
            n += 1;
        }
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

pub fn sum_present<I>(values: I) -> u64
where
    I: IntoIterator<Item = Option<u64>>,
{
    values.into_iter().flatten().sum()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FiveNumber {
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

pub fn five_number(values: &[f64]) -> FiveNumber {
    let mut vals = values.to_vec();
    sort_finite(&mut vals);
    FiveNumber {
        min: quantile_sorted(&vals, 0.0),
        q25: quantile_sorted(&vals, 0.25),
        median: quantile_sorted(&vals, 0.5),
        q75: quantile_sorted(&vals, 0.75),
        max: quantile_sorted(&vals, 1.0),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/math/stats.rs"]
mod tests;
