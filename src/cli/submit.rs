use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use crate::config::Config;
use crate::submit::{JobInputs, submit_script, write_script};

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Directory of aligned BAM files
    pub(crate) bam_dir: PathBuf,

    /// File listing the samples to count
    pub(crate) sample_list: PathBuf,

    /// Output directory for counts, job script and logs
    pub(crate) out_dir: PathBuf,

    /// TOML configuration file ([submit] section)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Write and print the job script without submitting it
    #[arg(long, default_value_t = false)]
    pub(crate) dry_run: bool,
}

pub fn handle(args: SubmitArgs) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let inputs = JobInputs {
        bam_dir: args.bam_dir,
        sample_list: args.sample_list,
        out_dir: args.out_dir,
    };
    let script = write_script(&config.submit, &inputs)?;

    if args.dry_run {
        print!("{}", std::fs::read_to_string(&script)?);
        return Ok(());
    }

    let status = submit_script(&config.submit, &script)?;
    info!(status = %status, "scheduler returned");
    if !status.success() {
        warn!(status = %status, "scheduler reported failure");
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}
