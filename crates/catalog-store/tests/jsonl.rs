//! File output tests using temporary directories.

mod common;

use std::fs;

use catalog_core::ProductRecord;
use catalog_store::{write_failed_urls, JsonlWriter};

#[test]
fn writer_creates_directories_and_writes_one_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/output/products.jsonl");

    let mut writer = JsonlWriter::open(&path).unwrap();
    writer.append(&common::record("A1")).unwrap();
    writer.append(&common::record("B2")).unwrap();
    assert_eq!(writer.written(), 2);
    assert_eq!(writer.path(), path.as_path());

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: ProductRecord = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first, common::record("A1"));
    assert!(contents.ends_with('\n'));
}

#[test]
fn reopening_appends_instead_of_truncating() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.jsonl");

    JsonlWriter::open(&path)
        .unwrap()
        .append(&common::record("A1"))
        .unwrap();
    let mut second_run = JsonlWriter::open(&path).unwrap();
    second_run.append(&common::record("A1")).unwrap();
    assert_eq!(second_run.written(), 1);

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn lines_are_compact_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.jsonl");
    let mut writer = JsonlWriter::open(&path).unwrap();
    writer.append(&common::record("C3")).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(contents.trim_end()).unwrap();
    assert_eq!(value["product_code"], "C3");
    assert_eq!(value["price"], serde_json::json!(1200.0));
    assert!(!contents.trim_end().contains('\n'));
}

#[test]
fn failed_urls_written_one_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/failed_urls.txt");
    let urls = vec![
        "https://www.miumiu.com/eu/en/p/a/1".to_string(),
        "https://www.miumiu.com/eu/en/p/b/2".to_string(),
    ];

    assert!(write_failed_urls(&path, &urls).unwrap());
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().collect::<Vec<_>>(), urls);
}

#[test]
fn failed_urls_replace_previous_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("failed_urls.txt");
    fs::write(&path, "stale-1\nstale-2\nstale-3\n").unwrap();

    write_failed_urls(&path, &["fresh".to_string()]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
}

#[test]
fn no_failed_urls_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("failed_urls.txt");

    assert!(!write_failed_urls(&path, &[]).unwrap());
    assert!(!path.exists());
}
