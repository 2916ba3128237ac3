use crate::centroids::defs::CentroidSet;
use crate::math::rank::{average_ranks, pearson};

/// Spearman nearest-centroid classifier over a fixed gene panel.
#[derive(Debug, Clone)]
pub struct NearestCentroid {
    labels: Vec<String>,
    centroid_ranks: Vec<Vec<f64>>,
}

impl NearestCentroid {
    pub fn new(centroids: &CentroidSet) -> Self {
        Self {
            labels: centroids.labels().map(str::to_string).collect(),
            centroid_ranks: centroids
                .centroids
                .iter()
                .map(|c| average_ranks(&c.weights))
                .collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, idx: usize) -> &str {
        &self.labels[idx]
    }

    pub fn n_genes(&self) -> usize {
        self.centroid_ranks.first().map_or(0, Vec::len)
    }

    /// Spearman correlation of `values` against every centroid, in label order.
    pub fn correlations(&self, values: &[f64]) -> Vec<f64> {
        let ranks = average_ranks(values);
        self.centroid_ranks
            .iter()
            .map(|c| pearson(&ranks, c))
            .collect()
    }

    pub fn classify(&self, values: &[f64]) -> Option<usize> {
        best_label(&self.correlations(values))
    }
}

/// Index of the maximum correlation. Undefined correlations never win and the lowest index
/// wins ties.
pub fn best_label(correlations: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &r) in correlations.iter().enumerate() {
        if r.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if r <= current => {}
            _ => best = Some((idx, r)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/classifier.rs"]
mod tests;
