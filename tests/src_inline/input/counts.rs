use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn reads_genes_and_pseudo_rows() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("S1.counts");
    fs::write(
        &path,
        "ENSG1\t10\nENSG2\t0\nENSG3\t7\n__no_feature\t4\n__ambiguous\t1\n",
    )
    .expect("write");
    let counts = read_count_file(&path).expect("read counts");
    assert_eq!(counts.genes, vec!["ENSG1", "ENSG2", "ENSG3"]);
    assert_eq!(counts.counts, vec![10, 0, 7]);
    assert_eq!(counts.assigned(), 17);
    assert_eq!(
        counts.pseudo,
        vec![
            ("__no_feature".to_string(), 4),
            ("__ambiguous".to_string(), 1)
        ]
    );
}

#[test]
fn header_line_is_skipped() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("S1.counts");
    fs::write(&path, "gene\tcount\nG1\t3\n").expect("write");
    let counts = read_count_file(&path).expect("read counts");
    assert_eq!(counts.genes, vec!["G1"]);
}

#[test]
fn malformed_first_row_is_not_taken_for_a_header() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("S1.counts");
    for first in ["GENE1\t1.5\n", "GENE1\t-3\n"] {
        fs::write(&path, format!("{first}GENE2\t3\n")).expect("write");
        let err = read_count_file(&path).expect_err("fractional or negative count");
        assert!(matches!(err, InputError::InvalidTsvRow { line: 1, .. }));
    }
}

#[test]
fn negative_count_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("S1.counts");
    fs::write(&path, "G1\t3\nG2\t-1\n").expect("write");
    let err = read_count_file(&path).expect_err("negative");
    assert!(matches!(err, InputError::InvalidTsvRow { line: 2, .. }));
}

#[test]
fn extra_column_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("S1.counts");
    fs::write(&path, "G1\t3\t4\n").expect("write");
    assert!(read_count_file(&path).is_err());
}

#[test]
fn only_pseudo_rows_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("S1.counts");
    fs::write(&path, "__no_feature\t3\n").expect("write");
    assert!(read_count_file(&path).is_err());
}

#[cfg(feature = "gz")]
#[test]
fn reads_gzipped_counts() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("S1.counts.gz");
    let file = fs::File::create(&path).expect("create");
    let mut enc = GzEncoder::new(file, Compression::default());
    enc.write_all(b"G1\t5\nG2\t6\n").expect("write gz");
    enc.finish().expect("finish gz");

    let counts = read_count_file(&path).expect("read gz");
    assert_eq!(counts.counts, vec![5, 6]);
}
