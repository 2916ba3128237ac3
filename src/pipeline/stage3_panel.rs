use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::centroids::defs::CentroidSet;
use crate::centroids::mapping::{PanelMapping, map_panel};
use crate::input::annotation::GeneIndex;
use crate::pipeline::stage2_normalize::ExprContext;

/// Fewer shared genes than this leave no meaningful rank correlation.
pub const MIN_PANEL_GENES: usize = 3;

#[derive(Debug, Error)]
pub enum Stage3Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "only {found} of {total} panel genes usable after filtering (need {min})",
        min = MIN_PANEL_GENES
    )]
    PanelTooSmall { found: usize, total: usize },
}

#[derive(Debug, Clone)]
pub struct PanelContext {
    /// Reference restricted to usable genes, in reference order.
    pub centroids: CentroidSet,
    pub mapping: PanelMapping,
    /// Panel genes present in the matrix but removed by the low-count filter.
    pub filtered: Vec<String>,
    /// Per sample, lcpm over the usable panel genes.
    pub values: Vec<Vec<f64>>,
}

impl PanelContext {
    pub fn n_genes(&self) -> usize {
        self.centroids.n_genes()
    }
}

pub fn run_stage3_panel(
    expr: &ExprContext,
    centroids: &CentroidSet,
    gene_index: &GeneIndex,
    out_dir: &Path,
) -> Result<PanelContext, Stage3Error> {
    let mapping = map_panel(centroids, gene_index);

    let mut usable = Vec::new();
    let mut columns = Vec::new();
    let mut filtered = Vec::new();
    for (pos, row) in mapping.mapped.iter().enumerate() {
        let Some(row) = row else { continue };
        match expr.kept_position[*row] {
            Some(col) => {
                usable.push(pos);
                columns.push(col);
            }
            None => filtered.push(centroids.genes[pos].clone()),
        }
    }

    if !mapping.missing.is_empty() {
        warn!(
            missing = mapping.missing.len(),
            genes = %mapping.missing.join(","),
            "panel genes absent from count matrix"
        );
    }
    if !filtered.is_empty() {
        warn!(
            filtered = filtered.len(),
            genes = %filtered.join(","),
            "panel genes removed by low-count filter"
        );
    }
    if usable.len() < MIN_PANEL_GENES {
        return Err(Stage3Error::PanelTooSmall {
            found: usable.len(),
            total: centroids.n_genes(),
        });
    }

    let values: Vec<Vec<f64>> = expr
        .lcpm
        .iter()
        .map(|sample| columns.iter().map(|&c| sample[c]).collect())
        .collect();

    write_panel_mapping(out_dir, centroids, &mapping, &filtered)?;

    Ok(PanelContext {
        centroids: centroids.restrict(&usable),
        mapping,
        filtered,
        values,
    })
}

fn write_panel_mapping(
    out_dir: &Path,
    centroids: &CentroidSet,
    mapping: &PanelMapping,
    filtered: &[String],
) -> Result<(), std::io::Error> {
    let mut writer =
        std::io::BufWriter::new(std::fs::File::create(out_dir.join("panel_mapping.tsv"))?);
    writer.write_all(b"gene\tmatrix_row\tstatus\n")?;
    for (gene, row) in centroids.genes.iter().zip(mapping.mapped.iter()) {
        let (row_str, status) = match row {
            None => ("NA".to_string(), "missing"),
            Some(r) if filtered.contains(gene) => (r.to_string(), "filtered"),
            Some(r) => (r.to_string(), "used"),
        };
        writer.write_all(format!("{gene}\t{row_str}\t{status}\n").as_bytes())?;
    }
    writer.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_panel.rs"]
mod tests;
