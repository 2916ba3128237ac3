//! Batch submission of the external gene-counting pipeline.
//!
//! The counting itself runs outside this crate. This module only renders the scheduler script
//! and hands it to the scheduler; the scheduler's exit status is passed through unchanged.

pub mod script;

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use script::render_script;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("missing required input: {0}")]
    MissingInput(String),
    #[error("unknown placeholder {0} in submit.args")]
    UnknownPlaceholder(String),
    #[error("scheduler directive path contains whitespace: {0}")]
    UnsupportedPath(String),
    #[error("failed to launch scheduler {scheduler}: {source}")]
    Launch {
        scheduler: String,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmitConfig {
    pub scheduler: String,
    pub program: String,
    /// Reference genome / configuration tag passed to every job.
    pub reference: String,
    /// Program arguments; `{reference}`, `{cpus}`, `{bam_dir}`, `{sample_list}` and `{out_dir}`
    /// are substituted.
    pub args: Vec<String>,
    pub job_name: String,
    /// Relative paths resolve under the output directory.
    pub log_dir: PathBuf,
    pub partition: String,
    pub time: String,
    pub mem: String,
    pub cpus: u32,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            scheduler: "sbatch".to_string(),
            program: "rnaseq-count".to_string(),
            reference: "GRCh38".to_string(),
            args: [
                "--genome",
                "{reference}",
                "--threads",
                "{cpus}",
                "{bam_dir}",
                "{sample_list}",
                "{out_dir}",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            job_name: "gene-counts".to_string(),
            log_dir: PathBuf::from("logs"),
            partition: String::new(),
            time: "24:00:00".to_string(),
            mem: "32G".to_string(),
            cpus: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobInputs {
    pub bam_dir: PathBuf,
    pub sample_list: PathBuf,
    pub out_dir: PathBuf,
}

impl JobInputs {
    pub fn check(&self) -> Result<(), SubmitError> {
        if !self.bam_dir.is_dir() {
            return Err(SubmitError::MissingInput(format!(
                "BAM directory {}",
                self.bam_dir.display()
            )));
        }
        if !self.sample_list.is_file() {
            return Err(SubmitError::MissingInput(format!(
                "sample list {}",
                self.sample_list.display()
            )));
        }
        Ok(())
    }

    pub fn log_dir(&self, config: &SubmitConfig) -> PathBuf {
        if config.log_dir.is_absolute() {
            config.log_dir.clone()
        } else {
            self.out_dir.join(&config.log_dir)
        }
    }
}

/// Writes the job script under the output directory and returns its path.
pub fn write_script(config: &SubmitConfig, inputs: &JobInputs) -> Result<PathBuf, SubmitError> {
    inputs.check()?;
    let text = render_script(config, inputs)?;
    std::fs::create_dir_all(&inputs.out_dir)?;
    std::fs::create_dir_all(inputs.log_dir(config))?;

    let path = inputs.out_dir.join(format!("{}.sbatch", config.job_name));
    std::fs::write(&path, text)?;
    info!(script = %path.display(), "job script written");
    Ok(path)
}

pub fn submit_script(config: &SubmitConfig, script: &Path) -> Result<ExitStatus, SubmitError> {
    info!(scheduler = config.scheduler.as_str(), script = %script.display(), "submitting job");
    Command::new(&config.scheduler)
        .arg(script)
        .status()
        .map_err(|source| SubmitError::Launch {
            scheduler: config.scheduler.clone(),
            source,
        })
}

#[cfg(test)]
#[path = "../../tests/src_inline/submit/mod.rs"]
mod tests;
