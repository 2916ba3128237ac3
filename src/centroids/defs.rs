use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Centroid {
    pub label: String,
    pub weights: Vec<f64>,
}

/// Reference weight matrix: one centroid per subtype label over a shared gene panel.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CentroidSet {
    pub genes: Vec<String>,
    pub centroids: Vec<Centroid>,
}

impl CentroidSet {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.centroids.iter().map(|c| c.label.as_str())
    }

    pub fn n_labels(&self) -> usize {
        self.centroids.len()
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    /// Copy restricted to the gene positions in `keep`, preserving label order.
    pub fn restrict(&self, keep: &[usize]) -> CentroidSet {
        CentroidSet {
            genes: keep.iter().map(|&i| self.genes[i].clone()).collect(),
            centroids: self
                .centroids
                .iter()
                .map(|c| Centroid {
                    label: c.label.clone(),
                    weights: keep.iter().map(|&i| c.weights[i]).collect(),
                })
                .collect(),
        }
    }
}
