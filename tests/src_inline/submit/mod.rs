use super::*;
use std::fs;
use tempfile::tempdir;

fn inputs(root: &Path) -> JobInputs {
    let bam_dir = root.join("bams");
    fs::create_dir_all(&bam_dir).expect("bam dir");
    let sample_list = root.join("samples.txt");
    fs::write(&sample_list, "S1\nS2\n").expect("sample list");
    JobInputs {
        bam_dir,
        sample_list,
        out_dir: root.join("out"),
    }
}

#[test]
fn writes_script_and_log_dir() {
    let dir = tempdir().expect("tempdir");
    let inputs = inputs(dir.path());
    let config = SubmitConfig::default();
    let script = write_script(&config, &inputs).expect("write script");
    assert_eq!(script, inputs.out_dir.join("gene-counts.sbatch"));
    assert!(inputs.out_dir.join("logs").is_dir());
    let text = fs::read_to_string(&script).expect("read script");
    assert!(text.starts_with("#!/bin/bash\n"));
    assert!(text.contains("rnaseq-count --genome GRCh38 --threads 8"));
}

#[test]
fn missing_inputs_are_reported() {
    let dir = tempdir().expect("tempdir");
    let mut job = inputs(dir.path());
    job.sample_list = dir.path().join("absent.txt");
    let err = write_script(&SubmitConfig::default(), &job).expect_err("missing list");
    assert!(matches!(err, SubmitError::MissingInput(_)));
    assert!(!job.out_dir.exists());
}

#[test]
fn rejected_log_dir_leaves_no_directories() {
    let dir = tempdir().expect("tempdir");
    let job = inputs(dir.path());
    let config = SubmitConfig {
        log_dir: PathBuf::from("slurm logs"),
        ..SubmitConfig::default()
    };
    let err = write_script(&config, &job).expect_err("whitespace log dir");
    assert!(matches!(err, SubmitError::UnsupportedPath(_)));
    assert!(!job.out_dir.exists());
}

#[test]
fn absolute_log_dir_is_kept() {
    let dir = tempdir().expect("tempdir");
    let job = inputs(dir.path());
    let config = SubmitConfig {
        log_dir: dir.path().join("slurm-logs"),
        ..SubmitConfig::default()
    };
    assert_eq!(job.log_dir(&config), dir.path().join("slurm-logs"));
}

#[cfg(unix)]
#[test]
fn scheduler_status_is_passed_through() {
    let dir = tempdir().expect("tempdir");
    let job = inputs(dir.path());
    let ok = SubmitConfig {
        scheduler: "true".to_string(),
        ..SubmitConfig::default()
    };
    let script = write_script(&ok, &job).expect("write script");
    assert!(submit_script(&ok, &script).expect("run").success());

    let failing = SubmitConfig {
        scheduler: "false".to_string(),
        ..SubmitConfig::default()
    };
    let status = submit_script(&failing, &script).expect("run");
    assert_eq!(status.code(), Some(1));
}

#[test]
fn missing_scheduler_is_a_launch_error() {
    let dir = tempdir().expect("tempdir");
    let config = SubmitConfig {
        scheduler: "definitely-not-a-scheduler-binary".to_string(),
        ..SubmitConfig::default()
    };
    let err = submit_script(&config, &dir.path().join("job.sbatch")).expect_err("launch");
    assert!(matches!(err, SubmitError::Launch { .. }));
}
