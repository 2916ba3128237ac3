use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use tracing::info;

use crate::centroids::loader::load_centroids;
use crate::centroids::mapping::map_panel;
use crate::pipeline::stage1_load::{DatasetCtx, LoadInputs, run_stage1};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Sample table of contents (TSV)
    #[arg(long)]
    pub(crate) toc: PathBuf,

    /// Directory holding the per-sample count files
    #[arg(long)]
    pub(crate) counts_dir: PathBuf,

    /// Output directory
    #[arg(long)]
    pub(crate) out: PathBuf,

    #[arg(long)]
    pub(crate) read_stats: Option<PathBuf>,

    #[arg(long)]
    pub(crate) run_meta: Option<PathBuf>,

    #[arg(long)]
    pub(crate) annotation: Option<PathBuf>,

    /// Optional weight matrix to check panel coverage against
    #[arg(long)]
    pub(crate) centroids: Option<PathBuf>,
}

pub fn handle(args: ValidateArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out)?;

    let start = Instant::now();
    info!(stage = "stage1_load", "starting stage");
    let ctx = run_stage1(&LoadInputs {
        toc: args.toc.clone(),
        counts_dir: args.counts_dir.clone(),
        read_stats: args.read_stats.clone(),
        run_meta: args.run_meta.clone(),
        annotation: args.annotation.clone(),
    })?;
    info!(
        stage = "stage1_load",
        elapsed_ms = start.elapsed().as_millis(),
        "finished stage"
    );

    let panel = match &args.centroids {
        Some(path) => {
            let centroids = load_centroids(path)?;
            let mapping = map_panel(&centroids, &ctx.gene_index);
            Some((centroids.n_genes(), mapping.n_mapped()))
        }
        None => None,
    };

    write_validate(&args.out, &ctx, panel)?;
    write_gene_warnings(&args.out, &ctx)?;
    Ok(())
}

fn write_validate(
    out_dir: &Path,
    ctx: &DatasetCtx,
    panel: Option<(usize, usize)>,
) -> anyhow::Result<()> {
    let wts_missing = ctx.samples.iter().filter(|s| s.wts_project.is_none()).count();
    let read_stats_matched = ctx
        .samples
        .iter()
        .filter(|s| ctx.read_stats_for(s).is_some())
        .count();

    let mut lines = Vec::new();
    lines.push(("toc_file", ctx.toc_path.to_string_lossy().to_string()));
    lines.push(("n_samples", ctx.samples.len().to_string()));
    lines.push(("n_samples_counted", ctx.matrix.n_samples().to_string()));
    lines.push((
        "n_samples_without_counts",
        ctx.samples_without_counts.to_string(),
    ));
    lines.push(("n_samples_wts_missing", wts_missing.to_string()));
    lines.push(("n_genes", ctx.matrix.n_genes().to_string()));
    lines.push(("annotation_present", ctx.annotation_present.to_string()));
    lines.push((
        "duplicate_gene_symbols",
        ctx.duplicate_gene_symbols.len().to_string(),
    ));
    lines.push(("read_stats_projects", ctx.read_stats.len().to_string()));
    lines.push(("read_stats_samples_matched", read_stats_matched.to_string()));
    lines.push(("run_meta_projects", ctx.run_meta.len().to_string()));
    if let Some((total, mapped)) = panel {
        lines.push(("panel_genes", total.to_string()));
        lines.push(("panel_genes_mapped", mapped.to_string()));
    }

    let mut buf = String::new();
    for (k, v) in lines {
        buf.push_str(k);
        buf.push('\t');
        buf.push_str(&v);
        buf.push('\n');
    }
    std::fs::write(out_dir.join("validate.tsv"), buf)?;
    Ok(())
}

fn write_gene_warnings(out_dir: &Path, ctx: &DatasetCtx) -> anyhow::Result<()> {
    let mut buf = String::new();
    buf.push_str("symbol\tfirst_row\tdup_row\n");
    for dup in &ctx.duplicate_gene_symbols {
        buf.push_str(&dup.symbol);
        buf.push('\t');
        buf.push_str(&dup.first_row.to_string());
        buf.push('\t');
        buf.push_str(&dup.dup_row.to_string());
        buf.push('\n');
    }
    std::fs::write(out_dir.join("gene_mapping_warnings.tsv"), buf)?;
    Ok(())
}
