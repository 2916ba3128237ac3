use super::*;
use std::fs;
use tempfile::tempdir;

fn write(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("centroids.tsv");
    fs::write(&path, contents).expect("write centroids");
    path
}

#[test]
fn loads_labels_and_weights() {
    let dir = tempdir().expect("tempdir");
    let path = write(
        dir.path(),
        "# reference weights\ngene\tA\tB\ng1\t1\t3\ng2\t2\t2\ng3\t3\t1\n",
    );
    let set = load_centroids(&path).expect("load");
    assert_eq!(set.labels().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(set.genes, vec!["g1", "g2", "g3"]);
    assert_eq!(set.centroids[1].weights, vec![3.0, 2.0, 1.0]);
}

#[test]
fn restrict_keeps_label_order() {
    let dir = tempdir().expect("tempdir");
    let path = write(dir.path(), "gene\tA\tB\ng1\t1\t3\ng2\t2\t2\ng3\t3\t1\n");
    let set = load_centroids(&path).expect("load").restrict(&[0, 2]);
    assert_eq!(set.n_genes(), 2);
    assert_eq!(set.centroids[0].weights, vec![1.0, 3.0]);
    assert_eq!(set.centroids[1].label, "B");
}

#[test]
fn rejects_malformed_matrices() {
    let dir = tempdir().expect("tempdir");

    let path = write(dir.path(), "gene\n");
    assert!(matches!(load_centroids(&path), Err(CentroidLoadError::NoLabels)));

    let path = write(dir.path(), "gene\tA\tA\ng1\t1\t2\n");
    assert!(matches!(
        load_centroids(&path),
        Err(CentroidLoadError::DuplicateLabel(_))
    ));

    let path = write(dir.path(), "gene\tA\tB\ng1\t1\n");
    assert!(matches!(
        load_centroids(&path),
        Err(CentroidLoadError::ColumnCount { line: 2, expected: 3, found: 2 })
    ));

    let path = write(dir.path(), "gene\tA\ng1\t1\ng1\t2\n");
    assert!(matches!(
        load_centroids(&path),
        Err(CentroidLoadError::DuplicateGene { line: 3, .. })
    ));

    let path = write(dir.path(), "gene\tA\ng1\tNaN\n");
    assert!(matches!(
        load_centroids(&path),
        Err(CentroidLoadError::InvalidWeight { .. })
    ));

    let path = write(dir.path(), "gene\tA\n");
    assert!(matches!(load_centroids(&path), Err(CentroidLoadError::Empty(_))));
}
