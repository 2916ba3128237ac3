use std::path::Path;

use crate::input::{InputError, open_reader, path_display};

/// Prefix htseq-count uses for its summary rows.
pub const PSEUDO_GENE_PREFIX: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleCounts {
    pub genes: Vec<String>,
    pub counts: Vec<u64>,
    pub pseudo: Vec<(String, u64)>,
}

impl SampleCounts {
    pub fn assigned(&self) -> u64 {
        self.counts.iter().sum()
    }
}

pub fn is_pseudo_gene(id: &str) -> bool {
    id.starts_with(PSEUDO_GENE_PREFIX)
}

/// Reads a two-column `gene<TAB>count` file. A first line whose count column is not an
/// integer is taken as a header and skipped.
pub fn read_count_file(path: &Path) -> Result<SampleCounts, InputError> {
    let mut reader = open_reader(path)?;
    let mut out = SampleCounts::default();
    let mut line = String::new();
    let mut line_no = 0usize;

    let invalid = |line: usize, reason: String| InputError::InvalidTsvRow {
        path: path_display(path).to_string(),
        line,
        reason,
    };

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

        let mut parts = raw.split('\t');
        let (Some(id), Some(value)) = (parts.next(), parts.next()) else {
            return Err(invalid(line_no, "expected two tab-separated columns".to_string()));
        };
        if parts.next().is_some() {
            return Err(invalid(line_no, "expected two tab-separated columns".to_string()));
        }

        let count = match value.trim().parse::<u64>() {
            Ok(v) => v,
            // a non-numeric first row is a column header
            Err(_) if line_no == 1 && value.trim().parse::<f64>().is_err() => continue,
            Err(_) => {
                return Err(invalid(line_no, format!("count is not a non-negative integer: {value}")));
            }
        };

        let id = id.trim();
        if id.is_empty() {
            return Err(invalid(line_no, "empty gene identifier".to_string()));
        }
        if is_pseudo_gene(id) {
            out.pseudo.push((id.to_string(), count));
        } else {
            out.genes.push(id.to_string());
            out.counts.push(count);
        }
    }

    if out.genes.is_empty() {
        return Err(invalid(line_no, "no gene rows found".to_string()));
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/counts.rs"]
mod tests;
