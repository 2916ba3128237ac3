use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::input::na::{na_number, na_string};
use crate::input::{InputError, csv_error, open_tsv, path_display};

/// Read-count summary for one sequencing project.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReadStats {
    pub project: String,
    #[serde(default, deserialize_with = "na_number")]
    pub total_reads: Option<u64>,
    #[serde(default, deserialize_with = "na_number")]
    pub mapped_reads: Option<u64>,
    #[serde(default, deserialize_with = "na_number")]
    pub duplicate_reads: Option<u64>,
}

impl ReadStats {
    pub fn mapped_fraction(&self) -> Option<f64> {
        match (self.mapped_reads, self.total_reads) {
            (Some(mapped), Some(total)) if total > 0 => Some(mapped as f64 / total as f64),
            _ => None,
        }
    }
}

/// Sequencing-run metadata for one project.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunMeta {
    pub project: String,
    #[serde(default, deserialize_with = "na_string")]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "na_number")]
    pub read_length: Option<u32>,
    #[serde(default, deserialize_with = "na_string")]
    pub library_layout: Option<String>,
}

trait Keyed {
    fn project(&self) -> &str;
}

impl Keyed for ReadStats {
    fn project(&self) -> &str {
        &self.project
    }
}

impl Keyed for RunMeta {
    fn project(&self) -> &str {
        &self.project
    }
}

pub fn read_read_stats(path: &Path) -> Result<BTreeMap<String, ReadStats>, InputError> {
    read_keyed(path)
}

pub fn read_run_meta(path: &Path) -> Result<BTreeMap<String, RunMeta>, InputError> {
    read_keyed(path)
}

fn read_keyed<T>(path: &Path) -> Result<BTreeMap<String, T>, InputError>
where
    T: DeserializeOwned + Keyed,
{
    let mut reader = open_tsv(path)?;
    let mut out = BTreeMap::new();
    for (idx, row) in reader.deserialize::<T>().enumerate() {
        let record = row.map_err(|e| csv_error(path, e))?;
        let project = record.project().to_string();
        if project.is_empty() {
            return Err(InputError::InvalidTsvRow {
                path: path_display(path).to_string(),
                line: idx + 2,
                reason: "empty project identifier".to_string(),
            });
        }
        if out.contains_key(&project) {
            return Err(InputError::DuplicateProject {
                path: path_display(path).to_string(),
                project,
            });
        }
        out.insert(project, record);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tables.rs"]
mod tests;
