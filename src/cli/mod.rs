use clap::{Parser, Subcommand};

mod centroids;
mod run;
mod submit;
mod validate;

#[derive(Parser, Debug)]
#[command(name = "kira-subtype", version, about = "Kira Subtype CLI")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize counts, call subtypes and write the report tables
    Run(run::RunArgs),
    /// Load and cross-check all inputs without classifying
    Validate(validate::ValidateArgs),
    /// Inspect a reference weight matrix
    Centroids(centroids::CentroidsArgs),
    /// Submit the external gene-counting job to the batch scheduler
    Submit(submit::SubmitArgs),
}

impl Cli {
    pub fn dispatch(self) -> anyhow::Result<()> {
        match self.command {
            Command::Run(args) => run::handle(args),
            Command::Validate(args) => validate::handle(args),
            Command::Centroids(args) => centroids::handle(args),
            Command::Submit(args) => submit::handle(args),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/cli/mod.rs"]
mod tests;
