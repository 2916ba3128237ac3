use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::info;

use crate::centroids::loader::load_centroids;
use crate::config::Config;
use crate::model::params::{RngScope, ToleranceSearch};
use crate::pipeline::stage1_load::{LoadInputs, run_stage1};
use crate::pipeline::stage2_normalize::run_stage2;
use crate::pipeline::stage3_panel::run_stage3_panel;
use crate::pipeline::stage4_classify::{ClassifyContext, run_stage4_classify};
use crate::pipeline::stage5_report::run_stage5_report;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Sample table of contents (TSV)
    #[arg(long)]
    pub(crate) toc: PathBuf,

    /// Directory holding the per-sample count files
    #[arg(long)]
    pub(crate) counts_dir: PathBuf,

    /// Reference weight matrix (gene x subtype TSV)
    #[arg(long)]
    pub(crate) centroids: PathBuf,

    /// Output directory
    #[arg(long)]
    pub(crate) out: PathBuf,

    /// Read-count summary keyed by project
    #[arg(long)]
    pub(crate) read_stats: Option<PathBuf>,

    /// Sequencing-run metadata keyed by project
    #[arg(long)]
    pub(crate) run_meta: Option<PathBuf>,

    /// gene_id to symbol table for matching count identifiers to the panel
    #[arg(long)]
    pub(crate) annotation: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Override classification.seed
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Override classification.trials
    #[arg(long)]
    pub(crate) trials: Option<usize>,

    /// Use one random stream for all samples, consumed in table order
    #[arg(long, default_value_t = false)]
    pub(crate) shared_rng: bool,

    /// Override classification.search
    #[arg(long, value_enum)]
    pub(crate) search: Option<ToleranceSearch>,
}

impl RunArgs {
    pub(crate) fn load_inputs(&self) -> LoadInputs {
        LoadInputs {
            toc: self.toc.clone(),
            counts_dir: self.counts_dir.clone(),
            read_stats: self.read_stats.clone(),
            run_meta: self.run_meta.clone(),
            annotation: self.annotation.clone(),
        }
    }

    pub(crate) fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        let c = &mut config.classification;
        if let Some(seed) = self.seed {
            c.seed = seed;
        }
        if let Some(trials) = self.trials {
            c.trials = trials;
        }
        if self.shared_rng {
            c.rng_scope = RngScope::Shared;
        }
        if let Some(search) = self.search {
            c.search = search;
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn handle(args: RunArgs) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    std::fs::create_dir_all(&args.out)?;

    let centroids = load_centroids(&args.centroids)?;
    info!(
        labels = centroids.n_labels(),
        genes = centroids.n_genes(),
        "reference centroids loaded"
    );

    let start = Instant::now();
    info!(stage = "stage1_load", "starting stage");
    let ctx = run_stage1(&args.load_inputs())?;
    info!(
        stage = "stage1_load",
        elapsed_ms = start.elapsed().as_millis(),
        samples = ctx.samples.len(),
        counted = ctx.matrix.n_samples(),
        genes = ctx.matrix.n_genes(),
        "finished stage"
    );

    let start = Instant::now();
    info!(stage = "stage2_normalize", "starting stage");
    let expr_ctx = run_stage2(&ctx, config.normalization.clone())?;
    info!(
        stage = "stage2_normalize",
        elapsed_ms = start.elapsed().as_millis(),
        kept = expr_ctx.n_kept(),
        dropped = ctx.matrix.n_genes() - expr_ctx.n_kept(),
        "finished stage"
    );

    let start = Instant::now();
    info!(stage = "stage3_panel", "starting stage");
    let panel_ctx = run_stage3_panel(&expr_ctx, &centroids, &ctx.gene_index, &args.out)?;
    info!(
        stage = "stage3_panel",
        elapsed_ms = start.elapsed().as_millis(),
        used = panel_ctx.n_genes(),
        missing = panel_ctx.mapping.missing.len(),
        filtered = panel_ctx.filtered.len(),
        "finished stage"
    );

    let start = Instant::now();
    info!(stage = "stage4_classify", "starting stage");
    let classify_ctx = run_stage4_classify(&ctx, &panel_ctx, &config.classification, &args.out)?;
    log_subtype_counts(&classify_ctx);
    info!(
        stage = "stage4_classify",
        elapsed_ms = start.elapsed().as_millis(),
        "finished stage"
    );

    let start = Instant::now();
    info!(stage = "stage5_report", "starting stage");
    let _summary = run_stage5_report(
        &ctx,
        &expr_ctx,
        &panel_ctx,
        &classify_ctx,
        &config.report,
        &args.out,
    )?;
    info!(
        stage = "stage5_report",
        elapsed_ms = start.elapsed().as_millis(),
        "finished stage"
    );
    Ok(())
}

fn log_subtype_counts(ctx: &ClassifyContext) {
    for (label, count) in &ctx.summary.counts {
        tracing::info!(subtype = label.as_str(), count = *count);
    }
    if ctx.summary.unclassified > 0 {
        tracing::warn!(count = ctx.summary.unclassified, "unclassified samples");
    }
}
