use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::config::ReportParams;
use crate::expr::qc::CATEGORIES;
use crate::input::toc::SampleKey;
use crate::math::mds::classical_mds;
use crate::math::stats::{FiveNumber, five_number, mean_present, sum_present};
use crate::model::params::RngScope;
use crate::pipeline::stage1_load::DatasetCtx;
use crate::pipeline::stage2_normalize::ExprContext;
use crate::pipeline::stage3_panel::PanelContext;
use crate::pipeline::stage4_classify::ClassifyContext;
use crate::report::json::{write_manifest, write_summary};
use crate::report::text::render_report;
use crate::report::{fmt_f64, fmt_opt, fmt_opt_f64};

#[derive(Debug, Error)]
pub enum Stage5Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalSummary {
    pub tool: ToolSummary,
    pub input: InputSummary,
    pub subtypes: SubtypeCounts,
    /// Site → subtype → sample count.
    pub by_site: BTreeMap<String, BTreeMap<String, usize>>,
    pub qc: QcSummary,
    pub stability: StabilitySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub n_samples: usize,
    pub n_counted: usize,
    pub n_patients: usize,
    pub n_genes: usize,
    pub n_genes_kept: usize,
    pub n_panel_genes: usize,
    pub n_panel_genes_used: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubtypeCounts {
    pub labels: Vec<String>,
    pub counts: BTreeMap<String, usize>,
    pub fractions: BTreeMap<String, f64>,
    pub unclassified: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QcSummary {
    /// Mean over samples whose read-count summary is present.
    pub mean_mapped_fraction: Option<f64>,
    pub total_reads: u64,
    pub mean_assigned_fraction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StabilitySummary {
    pub noise_alpha: f64,
    pub trials: usize,
    pub seed: u64,
    pub rng_scope: String,
    pub consistency: FiveNumber,
    pub tolerance: FiveNumber,
}

pub fn run_stage5_report(
    dataset: &DatasetCtx,
    expr: &ExprContext,
    panel: &PanelContext,
    classify: &ClassifyContext,
    params: &ReportParams,
    out_dir: &Path,
) -> Result<FinalSummary, Stage5Error> {
    std::fs::create_dir_all(out_dir)?;

    let matrix_index: HashMap<&SampleKey, usize> = dataset
        .matrix
        .samples
        .iter()
        .enumerate()
        .map(|(i, k)| (k, i))
        .collect();

    write_samples_tsv(out_dir, dataset, classify, &matrix_index)?;
    write_alignment_qc(out_dir, dataset)?;
    write_lcpm_quantiles(out_dir, dataset, expr)?;
    write_mds(out_dir, dataset, expr, classify, params.mds_top)?;
    write_panel_lcpm(out_dir, dataset, panel, classify)?;

    let summary = build_summary(dataset, expr, panel, classify);
    write_summary(out_dir, &summary)?;
    write_manifest(out_dir, &summary)?;
    std::fs::write(out_dir.join("report.txt"), render_report(&summary))?;

    Ok(summary)
}

fn write_samples_tsv(
    out_dir: &Path,
    dataset: &DatasetCtx,
    classify: &ClassifyContext,
    matrix_index: &HashMap<&SampleKey, usize>,
) -> Result<(), Stage5Error> {
    let mut writer = BufWriter::new(std::fs::File::create(out_dir.join("samples.tsv"))?);
    writer.write_all(b"patient\tsample\tsite\twts_project\twgs_project\tcount_file\tplatform\tread_length\tsubtype\n")?;

    for record in &dataset.samples {
        let meta = dataset.run_meta_for(record);
        let subtype = matrix_index
            .get(&record.key())
            .map_or(crate::input::na::MISSING, |&i| classify.label_of(i));
        let line = format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            record.patient_id,
            record.sample_id,
            record.site_or_missing(),
            fmt_opt(record.wts_project.as_deref()),
            fmt_opt(record.wgs_project.as_deref()),
            fmt_opt(record.count_file.as_deref()),
            fmt_opt(meta.and_then(|m| m.platform.as_deref())),
            fmt_opt(meta.and_then(|m| m.read_length)),
            subtype,
        );
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_alignment_qc(out_dir: &Path, dataset: &DatasetCtx) -> Result<(), Stage5Error> {
    let mut writer = BufWriter::new(std::fs::File::create(out_dir.join("alignment_qc.tsv"))?);
    let mut header = String::from(
        "patient\tsample\twts_project\ttotal_reads\tmapped_reads\tmapped_fraction\tduplicate_reads\tcounted_reads",
    );
    for category in CATEGORIES {
        header.push_str("\tfrac_");
        header.push_str(category);
    }
    header.push('\n');
    writer.write_all(header.as_bytes())?;

    for (idx, qc) in dataset.matrix.qc.iter().enumerate() {
        let record = dataset.record(idx);
        let stats = dataset.read_stats_for(record);
        let mut line = format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.patient_id,
            record.sample_id,
            fmt_opt(record.wts_project.as_deref()),
            fmt_opt(stats.and_then(|s| s.total_reads)),
            fmt_opt(stats.and_then(|s| s.mapped_reads)),
            fmt_opt_f64(stats.and_then(|s| s.mapped_fraction())),
            fmt_opt(stats.and_then(|s| s.duplicate_reads)),
            qc.total(),
        );
        for frac in qc.fractions() {
            line.push('\t');
            line.push_str(&fmt_f64(frac));
        }
        line.push('\n');
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_lcpm_quantiles(
    out_dir: &Path,
    dataset: &DatasetCtx,
    expr: &ExprContext,
) -> Result<(), Stage5Error> {
    let mut writer = BufWriter::new(std::fs::File::create(out_dir.join("lcpm_quantiles.tsv"))?);
    writer.write_all(b"patient\tsample\tlibsize\tscale_factor\tmin\tq25\tmedian\tq75\tmax\n")?;
    for (idx, values) in expr.lcpm.iter().enumerate() {
        let key = &dataset.matrix.samples[idx];
        let q = five_number(values);
        let line = format!(
            "{}\t{}\t{}\t{:e}\t{}\t{}\t{}\t{}\t{}\n",
            key.patient_id,
            key.sample_id,
            expr.libsizes[idx],
            expr.scale_factors[idx],
            fmt_f64(q.min),
            fmt_f64(q.q25),
            fmt_f64(q.median),
            fmt_f64(q.q75),
            fmt_f64(q.max),
        );
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_mds(
    out_dir: &Path,
    dataset: &DatasetCtx,
    expr: &ExprContext,
    classify: &ClassifyContext,
    top: usize,
) -> Result<(), Stage5Error> {
    let coords = classical_mds(&expr.lcpm, top);
    let mut writer = BufWriter::new(std::fs::File::create(out_dir.join("mds.tsv"))?);
    writer.write_all(b"patient\tsample\tsubtype\tdim1\tdim2\n")?;
    for (idx, [x, y]) in coords.iter().enumerate() {
        let key = &dataset.matrix.samples[idx];
        let line = format!(
            "{}\t{}\t{}\t{}\t{}\n",
            key.patient_id,
            key.sample_id,
            classify.label_of(idx),
            fmt_f64(*x),
            fmt_f64(*y),
        );
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_panel_lcpm(
    out_dir: &Path,
    dataset: &DatasetCtx,
    panel: &PanelContext,
    classify: &ClassifyContext,
) -> Result<(), Stage5Error> {
    let mut writer = BufWriter::new(std::fs::File::create(out_dir.join("panel_lcpm.tsv"))?);
    writer.write_all(b"patient\tsample\tsubtype\tgene\tlcpm\n")?;
    for (idx, values) in panel.values.iter().enumerate() {
        let key = &dataset.matrix.samples[idx];
        let subtype = classify.label_of(idx);
        for (gene, value) in panel.centroids.genes.iter().zip(values.iter()) {
            let line = format!(
                "{}\t{}\t{}\t{}\t{}\n",
                key.patient_id,
                key.sample_id,
                subtype,
                gene,
                fmt_f64(*value)
            );
            writer.write_all(line.as_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn build_summary(
    dataset: &DatasetCtx,
    expr: &ExprContext,
    panel: &PanelContext,
    classify: &ClassifyContext,
) -> FinalSummary {
    let n_counted = dataset.matrix.n_samples();
    let patients: BTreeSet<&str> = dataset
        .samples
        .iter()
        .map(|s| s.patient_id.as_str())
        .collect();

    let mut counts = BTreeMap::new();
    let mut fractions = BTreeMap::new();
    for (label, count) in &classify.summary.counts {
        counts.insert(label.clone(), *count);
        let frac = if n_counted == 0 {
            0.0
        } else {
            *count as f64 / n_counted as f64
        };
        fractions.insert(label.clone(), frac);
    }

    let mut by_site: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for idx in 0..n_counted {
        let site = dataset.record(idx).site_or_missing().to_string();
        *by_site
            .entry(site)
            .or_default()
            .entry(classify.label_of(idx).to_string())
            .or_insert(0) += 1;
    }

    let records: Vec<_> = (0..n_counted).map(|i| dataset.record(i)).collect();
    let mean_mapped_fraction = mean_present(
        records
            .iter()
            .map(|r| dataset.read_stats_for(r).and_then(|s| s.mapped_fraction())),
    );
    // read-count summaries are per project; several samples may share one
    let projects: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.wts_project.as_deref())
        .collect();
    let total_reads = sum_present(
        projects
            .iter()
            .map(|p| dataset.read_stats.get(*p).and_then(|s| s.total_reads)),
    );
    let mean_assigned_fraction = mean_present(
        dataset
            .matrix
            .qc
            .iter()
            .map(|qc| (qc.total() > 0).then(|| qc.fractions()[0])),
    )
    .unwrap_or(0.0);

    let consistencies: Vec<f64> = classify.calls.iter().map(|c| c.consistency).collect();
    let tolerances: Vec<f64> = classify.calls.iter().map(|c| c.tolerance).collect();
    let params = &classify.params;

    FinalSummary {
        tool: ToolSummary {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputSummary {
            n_samples: dataset.samples.len(),
            n_counted,
            n_patients: patients.len(),
            n_genes: dataset.matrix.n_genes(),
            n_genes_kept: expr.n_kept(),
            n_panel_genes: panel.mapping.mapped.len(),
            n_panel_genes_used: panel.n_genes(),
        },
        subtypes: SubtypeCounts {
            labels: classify.labels.clone(),
            counts,
            fractions,
            unclassified: classify.summary.unclassified,
        },
        by_site,
        qc: QcSummary {
            mean_mapped_fraction,
            total_reads,
            mean_assigned_fraction,
        },
        stability: StabilitySummary {
            noise_alpha: params.noise_alpha,
            trials: params.trials,
            seed: params.seed,
            rng_scope: match params.rng_scope {
                RngScope::PerSample => "per_sample".to_string(),
                RngScope::Shared => "shared".to_string(),
            },
            consistency: five_number(&consistencies),
            tolerance: five_number(&tolerances),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
