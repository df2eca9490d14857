use assert_cmd::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn write_model(bytes: &[u8]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp model");
    tmp.write_all(bytes).expect("write model");
    tmp
}

fn binary_triangle() -> Vec<u8> {
    let mut buffer = vec![0u8; 80];
    buffer[..8].copy_from_slice(b"fixture\0");
    buffer.extend_from_slice(&1u32.to_le_bytes());
    for value in [0.0f32, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
        buffer.extend_from_slice(&value.to_le_bytes());
    }
    buffer.extend_from_slice(&0u16.to_le_bytes());
    buffer
}

#[test]
fn summary_reports_binary_model() {
    let model = write_model(&binary_triangle());
    let mut cmd = Command::cargo_bin("meshview").expect("binary exists");
    cmd.arg(model.path())
        .arg("--summary")
        .assert()
        .success()
        .stdout(contains("encoding: Binary"))
        .stdout(contains("name: fixture"))
        .stdout(contains("triangles: 1"))
        .stdout(contains("vertices: 3"));
}

#[test]
fn summary_reports_dropped_ascii_facets() {
    let text = "solid broken
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
endloop
endfacet
endsolid broken
";
    let model = write_model(text.as_bytes());
    let mut cmd = Command::cargo_bin("meshview").expect("binary exists");
    cmd.arg(model.path())
        .arg("--summary")
        .assert()
        .success()
        .stdout(contains("encoding: Ascii"))
        .stdout(contains("triangles: 0"))
        .stdout(contains("dropped facets: 1"));
}

#[test]
fn missing_model_fails() {
    let mut cmd = Command::cargo_bin("meshview").expect("binary exists");
    cmd.arg("definitely/not/here.stl")
        .arg("--summary")
        .assert()
        .failure()
        .stderr(contains("failed to load STL file"))
        .stderr(contains("cannot open"));
}

#[test]
fn truncated_model_fails() {
    let mut bytes = binary_triangle();
    bytes.truncate(100);
    let model = write_model(&bytes);
    let mut cmd = Command::cargo_bin("meshview").expect("binary exists");
    cmd.arg(model.path())
        .arg("--summary")
        .assert()
        .failure()
        .stderr(contains("truncated binary STL"));
}

#[test]
fn usage_without_arguments() {
    let mut cmd = Command::cargo_bin("meshview").expect("binary exists");
    cmd.assert().failure().stderr(contains("Usage: meshview"));
}

#[test]
fn rejects_unknown_flag() {
    let model = write_model(&binary_triangle());
    let mut cmd = Command::cargo_bin("meshview").expect("binary exists");
    cmd.arg(model.path())
        .arg("--fast")
        .assert()
        .failure()
        .stderr(contains("Unknown argument: --fast"));
}
