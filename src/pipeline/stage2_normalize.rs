use thiserror::Error;

use crate::expr::normalize::{Normalization, filter_genes, lcpm, scale_factor};
use crate::pipeline::stage1_load::DatasetCtx;

#[derive(Debug, Error)]
pub enum Stage2Error {
    #[error("no gene reaches {min_count} counts in {min_samples} samples")]
    NoGenesKept { min_count: u64, min_samples: usize },
}

#[derive(Debug, Clone)]
pub struct ExprContext {
    /// Matrix gene indices that passed the low-count filter.
    pub kept: Vec<usize>,
    /// For every matrix gene, its column in `lcpm` when kept.
    pub kept_position: Vec<Option<usize>>,
    pub scale_factors: Vec<f64>,
    pub libsizes: Vec<u64>,
    /// Per sample, lcpm over the kept genes.
    pub lcpm: Vec<Vec<f64>>,
    pub normalization: Normalization,
}

impl ExprContext {
    pub fn n_kept(&self) -> usize {
        self.kept.len()
    }
}

pub fn run_stage2(
    ctx: &DatasetCtx,
    normalization: Normalization,
) -> Result<ExprContext, Stage2Error> {
    let matrix = &ctx.matrix;
    let kept = filter_genes(matrix, &normalization);
    if kept.is_empty() {
        return Err(Stage2Error::NoGenesKept {
            min_count: normalization.min_count,
            min_samples: normalization.min_samples,
        });
    }

    let mut kept_position = vec![None; matrix.n_genes()];
    for (col, &gene) in kept.iter().enumerate() {
        kept_position[gene] = Some(col);
    }

    let mut scale_factors = Vec::with_capacity(matrix.n_samples());
    let mut libsizes = Vec::with_capacity(matrix.n_samples());
    let mut values = Vec::with_capacity(matrix.n_samples());
    for sample_idx in 0..matrix.n_samples() {
        let counts = matrix.sample_counts(sample_idx);
        let factor = scale_factor(counts, &kept, &normalization);
        libsizes.push(kept.iter().map(|&g| counts[g]).sum());
        values.push(
            kept.iter()
                .map(|&g| lcpm(counts[g], factor, normalization.prior))
                .collect(),
        );
        scale_factors.push(factor);
    }

    Ok(ExprContext {
        kept,
        kept_position,
        scale_factors,
        libsizes,
        lcpm: values,
        normalization,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_normalize.rs"]
mod tests;
