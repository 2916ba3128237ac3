use crate::pipeline::stage5_report::FinalSummary;

pub fn render_report(summary: &FinalSummary) -> String {
    let mut out = String::new();
    out.push_str("Kira Subtype Report\n");
    out.push_str("===================\n\n");
    out.push_str("Subtype calls come from rank correlation against fixed reference centroids. ");
    out.push_str("Consistency and tolerance describe how stable each call is under simulated noise; ");
    out.push_str("they are not calibrated probabilities.\n\n");

    out.push_str("Dataset overview:\n");
    out.push_str(&format!(
        "- Samples in table of contents: {}\n",
        summary.input.n_samples
    ));
    out.push_str(&format!("- Samples with counts: {}\n", summary.input.n_counted));
    out.push_str(&format!("- Patients: {}\n", summary.input.n_patients));
    out.push_str(&format!(
        "- Genes: {} ({} after low-count filter)\n",
        summary.input.n_genes, summary.input.n_genes_kept
    ));
    out.push_str(&format!(
        "- Panel genes used: {} of {}\n\n",
        summary.input.n_panel_genes_used, summary.input.n_panel_genes
    ));

    out.push_str("Subtypes:\n");
    for label in &summary.subtypes.labels {
        let count = summary.subtypes.counts.get(label).copied().unwrap_or(0);
        let frac = summary.subtypes.fractions.get(label).copied().unwrap_or(0.0);
        out.push_str(&format!("- {}: {} ({:.2}%)\n", label, count, frac * 100.0));
    }
    if summary.subtypes.unclassified > 0 {
        out.push_str(&format!("- unclassified: {}\n", summary.subtypes.unclassified));
    }
    out.push('\n');

    if !summary.by_site.is_empty() {
        out.push_str("Subtypes by site:\n");
        for (site, counts) in &summary.by_site {
            let parts: Vec<String> = counts.iter().map(|(l, c)| format!("{l}={c}")).collect();
            out.push_str(&format!("- {}: {}\n", site, parts.join(", ")));
        }
        out.push('\n');
    }

    out.push_str("Alignment QC:\n");
    match summary.qc.mean_mapped_fraction {
        Some(f) => out.push_str(&format!("- Mean mapped fraction: {:.2}%\n", f * 100.0)),
        None => out.push_str("- Mean mapped fraction: NA\n"),
    }
    out.push_str(&format!(
        "- Mean assigned fraction of counted reads: {:.2}%\n\n",
        summary.qc.mean_assigned_fraction * 100.0
    ));

    let s = &summary.stability;
    out.push_str("Call stability:\n");
    out.push_str(&format!(
        "- Noise amplitude {:.3}, {} trials, seed {} ({})\n",
        s.noise_alpha, s.trials, s.seed, s.rng_scope
    ));
    out.push_str(&format!("- Median consistency: {:.4}\n", s.consistency.median));
    out.push_str(&format!(
        "- Tolerance median {:.4}, q25 {:.4}, min {:.4}\n",
        s.tolerance.median, s.tolerance.q25, s.tolerance.min
    ));
    out.push('\n');

    out
}
