use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn reads_annotation_with_header() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("genes.tsv");
    fs::write(
        &path,
        "gene_id\tsymbol\nENSG1\tTP53\nENSG2\tNA\nENSG3\tMYC\n",
    )
    .expect("write");
    let ann = read_annotation(&path).expect("read annotation");
    assert_eq!(ann.len(), 2);
    assert_eq!(ann["ENSG1"], "TP53");
    assert!(!ann.contains_key("ENSG2"));
}

#[test]
fn index_falls_back_to_identifier() {
    let ids = vec!["G1".to_string(), "G2".to_string()];
    let index = build_gene_index(&ids, None);
    assert_eq!(index.row_of("G2"), Some(1));
    assert!(index.duplicates.is_empty());
}

#[test]
fn duplicate_symbols_keep_first_row() {
    let ids = vec!["E1".to_string(), "E2".to_string(), "E3".to_string()];
    let mut ann = HashMap::new();
    ann.insert("E1".to_string(), "A".to_string());
    ann.insert("E2".to_string(), "B".to_string());
    ann.insert("E3".to_string(), "A".to_string());
    let index = build_gene_index(&ids, Some(&ann));
    assert_eq!(index.row_of("A"), Some(0));
    assert_eq!(index.duplicates.len(), 1);
    assert_eq!(index.duplicates[0].dup_row, 2);
    assert_eq!(index.rows[1].symbol, "B");
}
