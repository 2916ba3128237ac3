use std::borrow::Cow;
use std::path::Path;

use shell_escape::escape;

use crate::submit::{JobInputs, SubmitConfig, SubmitError};

pub fn render_script(config: &SubmitConfig, inputs: &JobInputs) -> Result<String, SubmitError> {
    // %j expands to the scheduler job ID
    let stdout_log = directive_path(
        &inputs
            .log_dir(config)
            .join(format!("{}.%j.out", config.job_name)),
    )?;
    let stderr_log = directive_path(
        &inputs
            .log_dir(config)
            .join(format!("{}.%j.err", config.job_name)),
    )?;

    let mut out = String::with_capacity(512);
    out.push_str("#!/bin/bash\n");
    out.push_str(&format!("#SBATCH --job-name={}\n", config.job_name));
    out.push_str(&format!("#SBATCH --output={}\n", stdout_log));
    out.push_str(&format!("#SBATCH --error={}\n", stderr_log));
    out.push_str(&format!("#SBATCH --time={}\n", config.time));
    out.push_str(&format!("#SBATCH --mem={}\n", config.mem));
    out.push_str(&format!("#SBATCH --cpus-per-task={}\n", config.cpus));
    if !config.partition.is_empty() {
        out.push_str(&format!("#SBATCH --partition={}\n", config.partition));
    }
    out.push_str("set -euo pipefail\n\n");

    out.push_str("exec ");
    out.push_str(&escape(Cow::from(config.program.as_str())));
    for arg in &config.args {
        out.push(' ');
        out.push_str(&escape(Cow::from(expand(arg, config, inputs)?)));
    }
    out.push('\n');
    Ok(out)
}

/// `#SBATCH` values are not shell-parsed, so paths with whitespace cannot be expressed.
fn directive_path(path: &Path) -> Result<String, SubmitError> {
    let text = path_str(path);
    if text.chars().any(char::is_whitespace) {
        return Err(SubmitError::UnsupportedPath(text));
    }
    Ok(text)
}

fn expand(template: &str, config: &SubmitConfig, inputs: &JobInputs) -> Result<String, SubmitError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('}') else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };
        let name = &rest[start + 1..start + len];
        match name {
            "reference" => out.push_str(&config.reference),
            "cpus" => out.push_str(&config.cpus.to_string()),
            "bam_dir" => out.push_str(&path_str(&inputs.bam_dir)),
            "sample_list" => out.push_str(&path_str(&inputs.sample_list)),
            "out_dir" => out.push_str(&path_str(&inputs.out_dir)),
            other => return Err(SubmitError::UnknownPlaceholder(other.to_string())),
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
#[path = "../../tests/src_inline/submit/script.rs"]
mod tests;
