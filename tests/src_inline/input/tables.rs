use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn read_stats_keyed_by_project() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("reads.tsv");
    fs::write(
        &path,
        "project\ttotal_reads\tmapped_reads\tduplicate_reads\n\
         PRJ1\t1000\t900\t50\n\
         PRJ2\tNA\t10\tNA\n",
    )
    .expect("write");
    let stats = read_read_stats(&path).expect("read stats");
    assert_eq!(stats.len(), 2);
    let p1 = &stats["PRJ1"];
    assert_eq!(p1.total_reads, Some(1000));
    assert!((p1.mapped_fraction().expect("fraction") - 0.9).abs() < 1e-12);
    assert!(stats["PRJ2"].mapped_fraction().is_none());
}

#[test]
fn zero_total_reads_has_no_mapped_fraction() {
    let stats = ReadStats {
        project: "P".to_string(),
        total_reads: Some(0),
        mapped_reads: Some(0),
        duplicate_reads: None,
    };
    assert!(stats.mapped_fraction().is_none());
}

#[test]
fn run_meta_tolerates_missing_columns() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("runs.tsv");
    fs::write(&path, "project\tplatform\nPRJ1\tNovaSeq\nPRJ2\tNA\n").expect("write");
    let meta = read_run_meta(&path).expect("read meta");
    assert_eq!(meta["PRJ1"].platform.as_deref(), Some("NovaSeq"));
    assert!(meta["PRJ2"].platform.is_none());
    assert!(meta["PRJ1"].read_length.is_none());
}

#[test]
fn duplicate_project_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("reads.tsv");
    fs::write(&path, "project\ttotal_reads\nPRJ1\t1\nPRJ1\t2\n").expect("write");
    let err = read_read_stats(&path).expect_err("duplicate");
    assert!(matches!(err, InputError::DuplicateProject { ref project, .. } if project == "PRJ1"));
}
