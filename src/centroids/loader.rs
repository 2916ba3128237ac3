use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::centroids::defs::{Centroid, CentroidSet};
use crate::input::{InputError, open_reader};

#[derive(Debug, Error)]
pub enum CentroidLoadError {
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("empty weight matrix: {0}")]
    Empty(String),
    #[error("weight matrix header needs a gene column and at least one label")]
    NoLabels,
    #[error("duplicate label {0} in weight matrix header")]
    DuplicateLabel(String),
    #[error("duplicate gene {gene} at line {line}")]
    DuplicateGene { gene: String, line: usize },
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid weight {value:?} for {label}")]
    InvalidWeight {
        line: usize,
        label: String,
        value: String,
    },
}

/// Parses a `gene<TAB>label1<TAB>label2…` matrix, one gene per row.
pub fn load_centroids(path: &Path) -> Result<CentroidSet, CentroidLoadError> {
    let mut reader = open_reader(path)?;
    let mut line = String::new();
    let mut line_no = 0usize;

    let labels = loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(CentroidLoadError::Empty(path.to_string_lossy().to_string()));
        }
        line_no += 1;
        let raw = line.trim_end_matches(['\n', '\r']);
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        let cols: Vec<String> = raw.split('\t').map(|c| c.trim().to_string()).collect();
        if cols.len() < 2 {
            return Err(CentroidLoadError::NoLabels);
        }
        break cols[1..].to_vec();
    };

    let mut seen = HashSet::new();
    for label in &labels {
        if !seen.insert(label.as_str()) {
            return Err(CentroidLoadError::DuplicateLabel(label.clone()));
        }
    }

    let mut genes = Vec::new();
    let mut gene_set = HashSet::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); labels.len()];
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_no += 1;
        let raw = line.trim_end_matches(['\n', '\r']);
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = raw.split('\t').collect();
        if parts.len() != labels.len() + 1 {
            return Err(CentroidLoadError::ColumnCount {
                line: line_no,
                expected: labels.len() + 1,
                found: parts.len(),
            });
        }
        let gene = parts[0].trim().to_string();
        if !gene_set.insert(gene.clone()) {
            return Err(CentroidLoadError::DuplicateGene {
                gene,
                line: line_no,
            });
        }
        for (col, value) in parts[1..].iter().enumerate() {
            let parsed = value.trim().parse::<f64>().ok().filter(|v| v.is_finite());
            let Some(w) = parsed else {
                return Err(CentroidLoadError::InvalidWeight {
                    line: line_no,
                    label: labels[col].clone(),
                    value: value.to_string(),
                });
            };
            columns[col].push(w);
        }
        genes.push(gene);
    }

    if genes.is_empty() {
        return Err(CentroidLoadError::Empty(path.to_string_lossy().to_string()));
    }

    Ok(CentroidSet {
        genes,
        centroids: labels
            .into_iter()
            .zip(columns)
            .map(|(label, weights)| Centroid { label, weights })
            .collect(),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/centroids/loader.rs"]
mod tests;
