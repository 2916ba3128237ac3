use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::classifier::{NearestCentroid, best_label};
use crate::model::params::{ClassifyParams, RngScope};
use crate::model::seed::{TrialRng, sample_rng, shared_rng};
use crate::model::stability::{StabilityError, consistency, tolerance};
use crate::pipeline::stage1_load::DatasetCtx;
use crate::pipeline::stage3_panel::PanelContext;
use crate::report::fmt_f64;

#[derive(Debug, Error)]
pub enum Stage4Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stability estimate failed for sample {sample}: {source}")]
    Stability {
        sample: String,
        #[source]
        source: StabilityError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleCall {
    /// Index into `ClassifyContext::labels`; `None` when every correlation is undefined.
    pub label: Option<usize>,
    pub correlations: Vec<f64>,
    /// Consistency at the configured noise amplitude; NaN without a label.
    pub consistency: f64,
    pub tolerance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubtypeSummary {
    pub counts: Vec<(String, usize)>,
    pub unclassified: usize,
}

#[derive(Debug, Clone)]
pub struct ClassifyContext {
    pub labels: Vec<String>,
    pub calls: Vec<SampleCall>,
    pub params: ClassifyParams,
    pub summary: SubtypeSummary,
}

impl ClassifyContext {
    pub fn label_of(&self, sample_idx: usize) -> &str {
        self.calls[sample_idx]
            .label
            .map_or(crate::input::na::MISSING, |l| self.labels[l].as_str())
    }
}

pub fn run_stage4_classify(
    dataset: &DatasetCtx,
    panel: &PanelContext,
    params: &ClassifyParams,
    out_dir: &Path,
) -> Result<ClassifyContext, Stage4Error> {
    let classifier = NearestCentroid::new(&panel.centroids);
    let labels = classifier.labels().to_vec();

    let out_path = out_dir.join("classify.tsv");
    let mut writer = std::io::BufWriter::new(std::fs::File::create(&out_path)?);
    let mut header = String::from("patient\tsample\tsubtype");
    for label in &labels {
        header.push_str("\tcor_");
        header.push_str(label);
    }
    header.push_str("\tconsistency\ttolerance\n");
    writer.write_all(header.as_bytes())?;

    let mut shared = shared_rng(params.seed);
    let mut calls = Vec::with_capacity(panel.values.len());
    for (idx, values) in panel.values.iter().enumerate() {
        let key = &dataset.matrix.samples[idx];
        let mut own;
        let rng: &mut TrialRng = match params.rng_scope {
            RngScope::PerSample => {
                own = sample_rng(params.seed, key);
                &mut own
            }
            RngScope::Shared => &mut shared,
        };

        let call = classify_sample(&classifier, values, params, rng).map_err(|source| {
            Stage4Error::Stability {
                sample: key.to_string(),
                source,
            }
        })?;
        match call.label {
            Some(label) => debug!(
                sample = %key,
                subtype = labels[label].as_str(),
                consistency = call.consistency,
                tolerance = call.tolerance,
                "classified"
            ),
            None => warn!(sample = %key, "constant panel expression; sample left unclassified"),
        }

        let mut line = format!(
            "{}\t{}\t{}",
            key.patient_id,
            key.sample_id,
            call.label
                .map_or(crate::input::na::MISSING, |l| labels[l].as_str())
        );
        for r in &call.correlations {
            line.push('\t');
            line.push_str(&fmt_f64(*r));
        }
        line.push('\t');
        line.push_str(&fmt_f64(call.consistency));
        line.push('\t');
        line.push_str(&fmt_f64(call.tolerance));
        line.push('\n');
        writer.write_all(line.as_bytes())?;

        calls.push(call);
    }
    writer.flush()?;

    let summary = summarize(&labels, &calls);
    Ok(ClassifyContext {
        labels,
        calls,
        params: *params,
        summary,
    })
}

pub fn classify_sample(
    classifier: &NearestCentroid,
    values: &[f64],
    params: &ClassifyParams,
    rng: &mut TrialRng,
) -> Result<SampleCall, StabilityError> {
    let correlations = classifier.correlations(values);
    let label = best_label(&correlations);
    let (consistency_score, tolerance_score) = match label {
        Some(reference) => (
            consistency(
                classifier,
                values,
                reference,
                params.noise_alpha,
                params.trials,
                rng,
            )?,
            tolerance(classifier, values, reference, params, rng)?,
        ),
        None => (f64::NAN, f64::NAN),
    };
    Ok(SampleCall {
        label,
        correlations,
        consistency: consistency_score,
        tolerance: tolerance_score,
    })
}

fn summarize(labels: &[String], calls: &[SampleCall]) -> SubtypeSummary {
    let counts = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            (
                label.clone(),
                calls.iter().filter(|c| c.label == Some(idx)).count(),
            )
        })
        .collect();
    SubtypeSummary {
        counts,
        unclassified: calls.iter().filter(|c| c.label.is_none()).count(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_classify.rs"]
mod tests;
