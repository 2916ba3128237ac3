use std::path::Path;

use serde_json::json;

use crate::pipeline::stage5_report::{FinalSummary, Stage5Error};

pub const ARTIFACTS: [(&str, &str); 7] = [
    ("classification", "classify.tsv"),
    ("samples", "samples.tsv"),
    ("alignment_qc", "alignment_qc.tsv"),
    ("lcpm_quantiles", "lcpm_quantiles.tsv"),
    ("mds", "mds.tsv"),
    ("panel_lcpm", "panel_lcpm.tsv"),
    ("panel_mapping", "panel_mapping.tsv"),
];

pub fn write_summary(out_dir: &Path, summary: &FinalSummary) -> Result<(), Stage5Error> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(out_dir.join("summary.json"), json)?;
    Ok(())
}

/// Index of the run's artefacts for downstream notebooks.
pub fn write_manifest(out_dir: &Path, summary: &FinalSummary) -> Result<(), Stage5Error> {
    let artifacts: serde_json::Map<String, serde_json::Value> = ARTIFACTS
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();
    let manifest = json!({
        "tool": {
            "name": summary.tool.name,
            "version": summary.tool.version,
        },
        "artifacts": artifacts,
        "sample_columns": {
            "id_columns": ["patient", "sample"],
            "subtype_column": "subtype",
            "consistency_column": "consistency",
            "tolerance_column": "tolerance"
        },
        "labels": summary.subtypes.labels,
    });
    std::fs::write(
        out_dir.join("manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;
    Ok(())
}
