use std::collections::HashMap;
use std::path::Path;

use crate::input::{InputError, open_reader, path_display};

#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub id: String,
    pub symbol: String,
}

#[derive(Debug, Clone)]
pub struct DuplicateGene {
    pub symbol: String,
    pub first_row: usize,
    pub dup_row: usize,
}

/// Symbol lookup over the matrix genes, in matrix row order.
#[derive(Debug, Clone, Default)]
pub struct GeneIndex {
    pub rows: Vec<FeatureRow>,
    pub duplicates: Vec<DuplicateGene>,
    pub first_index_by_symbol: HashMap<String, usize>,
}

impl GeneIndex {
    pub fn row_of(&self, symbol: &str) -> Option<usize> {
        self.first_index_by_symbol.get(symbol).copied()
    }
}

/// Reads a `gene_id<TAB>symbol` table. An optional header row starting with `gene_id` is skipped.
pub fn read_annotation(path: &Path) -> Result<HashMap<String, String>, InputError> {
    let mut reader = open_reader(path)?;
    let mut out = HashMap::new();
    let mut line = String::new();
    let mut line_no = 0usize;

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
        if parts.len() < 2 {
            return Err(InputError::InvalidTsvRow {
                path: path_display(path).to_string(),
                line: line_no,
                reason: "expected gene_id and symbol columns".to_string(),
            });
        }
        if line_no == 1 && parts[0].eq_ignore_ascii_case("gene_id") {
            continue;
        }
        let symbol = parts[1].trim();
        if symbol.is_empty() || crate::input::na::is_missing(symbol) {
            continue;
        }
        out.entry(parts[0].trim().to_string())
            .or_insert_with(|| symbol.to_string());
    }

    Ok(out)
}

/// Builds the index for `gene_ids`, translating through `annotation` when given.
/// Identifiers without an annotation keep their identifier as symbol.
pub fn build_gene_index(
    gene_ids: &[String],
    annotation: Option<&HashMap<String, String>>,
) -> GeneIndex {
    let rows: Vec<FeatureRow> = gene_ids
        .iter()
        .map(|id| FeatureRow {
            id: id.clone(),
            symbol: annotation
                .and_then(|a| a.get(id))
                .cloned()
                .unwrap_or_else(|| id.clone()),
        })
        .collect();

    let mut duplicates = Vec::new();
    let mut first_index_by_symbol: HashMap<String, usize> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        if let Some(first_row) = first_index_by_symbol.get(&row.symbol).copied() {
            duplicates.push(DuplicateGene {
                symbol: row.symbol.clone(),
                first_row,
                dup_row: idx,
            });
        } else {
            first_index_by_symbol.insert(row.symbol.clone(), idx);
        }
    }

    GeneIndex {
        rows,
        duplicates,
        first_index_by_symbol,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/annotation.rs"]
mod tests;
