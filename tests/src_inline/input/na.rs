use super::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(deserialize_with = "na_string")]
    name: Option<String>,
    #[serde(deserialize_with = "na_number")]
    reads: Option<u64>,
}

fn parse(text: &str) -> Vec<Row> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(text.as_bytes());
    reader
        .deserialize::<Row>()
        .map(|r| r.expect("row"))
        .collect()
}

#[test]
fn missing_marker_is_none() {
    assert!(is_missing("NA"));
    assert!(is_missing("  NA "));
    assert!(is_missing(""));
    assert!(!is_missing("na"));
    assert!(!is_missing("0"));
}

#[test]
fn na_fields_deserialize_as_none() {
    let rows = parse("name\treads\nP1\t120\nNA\tNA\n\t\n");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].name.as_deref(), Some("P1"));
    assert_eq!(rows[0].reads, Some(120));
    assert!(rows[1].name.is_none());
    assert!(rows[1].reads.is_none());
    assert!(rows[2].name.is_none());
    assert!(rows[2].reads.is_none());
}

#[test]
fn bad_number_is_an_error() {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader("name\treads\nP1\tmany\n".as_bytes());
    let row = reader.deserialize::<Row>().next().expect("one row");
    assert!(row.is_err());
}
