use crate::centroids::defs::CentroidSet;
use crate::input::annotation::GeneIndex;

#[derive(Debug, Clone)]
pub struct PanelMapping {
    /// Matrix row per centroid gene, `None` when the gene is absent from the matrix.
    pub mapped: Vec<Option<usize>>,
    pub missing: Vec<String>,
}

impl PanelMapping {
    pub fn n_mapped(&self) -> usize {
        self.mapped.iter().filter(|m| m.is_some()).count()
    }
}

pub fn map_panel(centroids: &CentroidSet, gene_index: &GeneIndex) -> PanelMapping {
    let mut mapped = Vec::with_capacity(centroids.genes.len());
    let mut missing = Vec::new();
    for gene in &centroids.genes {
        match gene_index.row_of(gene) {
            Some(row) => mapped.push(Some(row)),
            None => {
                mapped.push(None);
                missing.push(gene.clone());
            }
        }
    }
    PanelMapping { mapped, missing }
}

#[cfg(test)]
#[path = "../../tests/src_inline/centroids/mapping.rs"]
mod tests;
