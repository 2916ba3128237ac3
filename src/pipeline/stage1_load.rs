use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::expr::matrix::{CountMatrix, GeneMismatch};
use crate::input::InputError;
use crate::input::annotation::{DuplicateGene, GeneIndex, build_gene_index, read_annotation};
use crate::input::counts::read_count_file;
use crate::input::tables::{ReadStats, RunMeta, read_read_stats, read_run_meta};
use crate::input::toc::{SampleRecord, read_toc};

#[derive(Debug, Error)]
pub enum Stage1Error {
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error(transparent)]
    GeneMismatch(#[from] GeneMismatch),
    #[error("no sample in {0} references a count file")]
    NoCountFiles(String),
}

#[derive(Debug, Clone, Default)]
pub struct LoadInputs {
    pub toc: PathBuf,
    pub counts_dir: PathBuf,
    pub read_stats: Option<PathBuf>,
    pub run_meta: Option<PathBuf>,
    pub annotation: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DatasetCtx {
    pub toc_path: PathBuf,
    pub samples: Vec<SampleRecord>,
    pub read_stats: BTreeMap<String, ReadStats>,
    pub run_meta: BTreeMap<String, RunMeta>,
    pub matrix: CountMatrix,
    /// Position in `samples` for each matrix sample.
    pub matrix_records: Vec<usize>,
    pub count_paths: Vec<PathBuf>,
    pub samples_without_counts: usize,
    pub gene_index: GeneIndex,
    pub annotation_present: bool,
    pub duplicate_gene_symbols: Vec<DuplicateGene>,
}

impl DatasetCtx {
    pub fn record(&self, matrix_idx: usize) -> &SampleRecord {
        &self.samples[self.matrix_records[matrix_idx]]
    }

    pub fn read_stats_for(&self, record: &SampleRecord) -> Option<&ReadStats> {
        record
            .wts_project
            .as_deref()
            .and_then(|p| self.read_stats.get(p))
    }

    pub fn run_meta_for(&self, record: &SampleRecord) -> Option<&RunMeta> {
        record
            .wts_project
            .as_deref()
            .and_then(|p| self.run_meta.get(p))
    }
}

pub fn run_stage1(inputs: &LoadInputs) -> Result<DatasetCtx, Stage1Error> {
    let samples = read_toc(&inputs.toc)?;

    let read_stats = match &inputs.read_stats {
        Some(path) => read_read_stats(path)?,
        None => BTreeMap::new(),
    };
    let run_meta = match &inputs.run_meta {
        Some(path) => read_run_meta(path)?,
        None => BTreeMap::new(),
    };
    let annotation: Option<HashMap<String, String>> = match &inputs.annotation {
        Some(path) => Some(read_annotation(path)?),
        None => None,
    };

    let mut matrix = CountMatrix::default();
    let mut matrix_records = Vec::new();
    let mut count_paths = Vec::new();
    let mut samples_without_counts = 0usize;

    for (idx, record) in samples.iter().enumerate() {
        let Some(file) = record.count_file.as_deref() else {
            samples_without_counts += 1;
            debug!(sample = %record.key(), "no count file");
            continue;
        };
        let path = resolve_count_path(&inputs.counts_dir, file);
        let counts = read_count_file(&path)?;
        matrix.push_sample(record.key(), counts, &path)?;
        matrix_records.push(idx);
        count_paths.push(path);
    }

    if matrix.n_samples() == 0 {
        return Err(Stage1Error::NoCountFiles(
            inputs.toc.to_string_lossy().to_string(),
        ));
    }
    if samples_without_counts > 0 {
        warn!(
            samples = samples_without_counts,
            "samples without a count file are excluded from expression analysis"
        );
    }

    for project in samples.iter().filter_map(|s| s.wts_project.as_deref()) {
        if inputs.read_stats.is_some() && !read_stats.contains_key(project) {
            warn!(project, "WTS project missing from read-count summary");
        }
    }

    let gene_index = build_gene_index(&matrix.genes, annotation.as_ref());
    let duplicate_gene_symbols = gene_index.duplicates.clone();
    if !duplicate_gene_symbols.is_empty() {
        warn!(
            count = duplicate_gene_symbols.len(),
            "duplicate gene symbols; first row kept"
        );
    }

    Ok(DatasetCtx {
        toc_path: inputs.toc.clone(),
        samples,
        read_stats,
        run_meta,
        matrix,
        matrix_records,
        count_paths,
        samples_without_counts,
        gene_index,
        annotation_present: annotation.is_some(),
        duplicate_gene_symbols,
    })
}

fn resolve_count_path(counts_dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        counts_dir.join(path)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_load.rs"]
mod tests;
