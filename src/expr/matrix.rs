use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::expr::qc::CountQc;
use crate::input::counts::SampleCounts;
use crate::input::toc::SampleKey;

#[derive(Debug, Error)]
#[error(
    "gene identifiers in {} differ from the combined matrix at row {position}: expected {expected}, found {found}",
    .path.display()
)]
pub struct GeneMismatch {
    pub path: PathBuf,
    pub position: usize,
    pub expected: String,
    pub found: String,
}

/// Sample-by-gene raw counts. Every sample shares the same ordered gene list.
#[derive(Debug, Clone, Default)]
pub struct CountMatrix {
    pub genes: Vec<String>,
    pub samples: Vec<SampleKey>,
    pub counts: Vec<Vec<u64>>,
    pub qc: Vec<CountQc>,
}

impl CountMatrix {
    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn sample_counts(&self, sample_idx: usize) -> &[u64] {
        &self.counts[sample_idx]
    }

    /// Appends one sample. The first sample fixes the gene order; later samples must match it
    /// exactly.
    pub fn push_sample(
        &mut self,
        key: SampleKey,
        counts: SampleCounts,
        source: &Path,
    ) -> Result<(), GeneMismatch> {
        if self.samples.is_empty() {
            self.genes = counts.genes.clone();
        } else if counts.genes != self.genes {
            let position = self
                .genes
                .iter()
                .zip(counts.genes.iter())
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| self.genes.len().min(counts.genes.len()));
            return Err(GeneMismatch {
                path: source.to_path_buf(),
                position,
                expected: self
                    .genes
                    .get(position)
                    .cloned()
                    .unwrap_or_else(|| "<end of list>".to_string()),
                found: counts
                    .genes
                    .get(position)
                    .cloned()
                    .unwrap_or_else(|| "<end of list>".to_string()),
            });
        }

        self.qc.push(CountQc::from_counts(&counts));
        self.samples.push(key);
        self.counts.push(counts.counts);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/expr/matrix.rs"]
mod tests;
