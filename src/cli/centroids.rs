use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::centroids::loader::load_centroids;

#[derive(Args, Debug)]
pub struct CentroidsArgs {
    #[command(subcommand)]
    pub(crate) command: CentroidsCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum CentroidsCommand {
    List(CentroidsListArgs),
    Dump(CentroidsDumpArgs),
}

#[derive(Args, Debug)]
pub struct CentroidsListArgs {
    /// Reference weight matrix
    #[arg(long)]
    pub(crate) centroids: PathBuf,
}

#[derive(Args, Debug)]
pub struct CentroidsDumpArgs {
    /// Reference weight matrix
    #[arg(long)]
    pub(crate) centroids: PathBuf,

    /// Output directory
    #[arg(long)]
    pub(crate) out: PathBuf,
}

pub fn handle(args: CentroidsArgs) -> anyhow::Result<()> {
    match args.command {
        CentroidsCommand::List(args) => list_centroids(args),
        CentroidsCommand::Dump(args) => dump_centroids(args),
    }
}

fn list_centroids(args: CentroidsListArgs) -> anyhow::Result<()> {
    let set = load_centroids(&args.centroids)?;
    println!("label\tn_genes\tmin_weight\tmax_weight");
    for centroid in &set.centroids {
        let min = centroid.weights.iter().copied().fold(f64::INFINITY, f64::min);
        let max = centroid
            .weights
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        println!(
            "{}\t{}\t{:.4}\t{:.4}",
            centroid.label,
            centroid.weights.len(),
            min,
            max
        );
    }
    Ok(())
}

fn dump_centroids(args: CentroidsDumpArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out)?;
    let set = load_centroids(&args.centroids)?;
    let json = serde_json::to_string_pretty(&set)?;
    std::fs::write(args.out.join("centroids.json"), json)?;
    Ok(())
}
