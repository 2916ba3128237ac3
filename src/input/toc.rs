use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::input::na::na_string;
use crate::input::{InputError, csv_error, open_tsv, path_display};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleKey {
    pub patient_id: String,
    pub sample_id: String,
}

impl SampleKey {
    pub fn new(patient_id: impl Into<String>, sample_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            sample_id: sample_id.into(),
        }
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.patient_id, self.sample_id)
    }
}

/// One row of the sample table of contents.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SampleRecord {
    #[serde(rename = "patient", alias = "patient_id")]
    pub patient_id: String,
    #[serde(rename = "sample", alias = "sample_id")]
    pub sample_id: String,
    #[serde(
        rename = "WTS.project",
        alias = "wts_project",
        default,
        deserialize_with = "na_string"
    )]
    pub wts_project: Option<String>,
    #[serde(
        rename = "WGS.project",
        alias = "wgs_project",
        default,
        deserialize_with = "na_string"
    )]
    pub wgs_project: Option<String>,
    #[serde(
        rename = "count.file",
        alias = "count_file",
        default,
        deserialize_with = "na_string"
    )]
    pub count_file: Option<String>,
    #[serde(rename = "site", alias = "tissue", default, deserialize_with = "na_string")]
    pub site: Option<String>,
}

impl SampleRecord {
    pub fn key(&self) -> SampleKey {
        SampleKey::new(self.patient_id.clone(), self.sample_id.clone())
    }

    pub fn site_or_missing(&self) -> &str {
        self.site.as_deref().unwrap_or(crate::input::na::MISSING)
    }
}

pub fn read_toc(path: &Path) -> Result<Vec<SampleRecord>, InputError> {
    let mut reader = open_tsv(path)?;
    let mut seen: HashSet<SampleKey> = HashSet::new();
    let mut records = Vec::new();

    for (idx, row) in reader.deserialize::<SampleRecord>().enumerate() {
        let record = row.map_err(|e| csv_error(path, e))?;
        let line = idx + 2;
        if record.patient_id.is_empty() || record.sample_id.is_empty() {
            return Err(InputError::InvalidTsvRow {
                path: path_display(path).to_string(),
                line,
                reason: "empty patient or sample identifier".to_string(),
            });
        }
        if !seen.insert(record.key()) {
            return Err(InputError::DuplicateSample(record.key().to_string()));
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(InputError::EmptyTable {
            path: path_display(path).to_string(),
        });
    }

    Ok(records)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/toc.rs"]
mod tests;
