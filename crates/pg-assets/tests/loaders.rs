//! Cross-module checks for the asset loaders against real files.

use pg_assets::{
    read_frame, read_json_file, read_markdown, read_records, render_html, substitute_placeholders,
    AssetKind, JsonRead,
};
use std::collections::HashMap;
use std::path::Path;

fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn markdown_template_renders_after_substitution() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "intro.md", "# Welcome {name}\n\nYou have {count} tries.\n");

    let raw = read_markdown(&path).unwrap();
    let replacements = HashMap::from([
        ("name".to_string(), "Ann".to_string()),
        ("count".to_string(), "3".to_string()),
    ]);
    let html = render_html(&substitute_placeholders(&raw, &replacements).unwrap());

    assert!(html.contains("<h1>Welcome Ann</h1>"));
    assert!(html.contains("You have 3 tries."));
}

#[test]
fn same_csv_two_views() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "scores.csv", "who,score\nann,10\nbob,7\n");
    assert!(AssetKind::Csv.matches(&path));

    let records = read_records(&path).unwrap();
    assert_eq!(records[1]["score"], "7");

    let frame = read_frame(&path, None).unwrap();
    let total: f64 = frame
        .column("score")
        .unwrap()
        .values
        .iter()
        .filter_map(pg_assets::Cell::as_f64)
        .sum();
    assert!((total - 17.0).abs() < f64::EPSILON);
}

#[test]
fn json_soft_and_hard_modes_agree_on_valid_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "doc.json", r#"{"enabled": true}"#);

    assert_eq!(read_json_file(&path, true), read_json_file(&path, false));
    assert!(matches!(read_json_file(&path, true), JsonRead::Value(v) if v["enabled"] == true));
}
