// ABOUTME: Integration tests for the cdom CLI binary.
// ABOUTME: Tests file and stdin input, root selection, output modes and error exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Test Page</title></head>
<body>
<nav><a>Home</a><a>About</a></nav>
<article class="post main"><p>Hi there</p><p>Second line</p></article>
</body>
</html>"#;

fn cdom_cmd() -> Command {
    Command::cargo_bin("cdom").unwrap()
}

fn write_page(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("page.html");
    fs::write(&path, PAGE).unwrap();
    path
}

#[test]
fn prints_json_tree_for_file() {
    let dir = TempDir::new().unwrap();
    let path = write_page(&dir);

    let output = cdom_cmd().arg(&path).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["root"], 0);
    assert_eq!(json["nodes"][0]["kind"], "node");
    assert_eq!(json["nodes"][0]["name"], "#document/html");
}

#[test]
fn prints_classpaths_with_root_selector() {
    let dir = TempDir::new().unwrap();
    let path = write_page(&dir);

    cdom_cmd()
        .arg("--root")
        .arg("article")
        .arg("--classpaths")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("article.main.post>p>#text\t\"Hi there\""))
        .stdout(predicate::str::contains("Home").not());
}

#[test]
fn prints_pairs_from_stdin() {
    let output = cdom_cmd()
        .arg("--pairs")
        .write_stdin("<p>a</p><p>b</p><p>c</p>")
        .output()
        .unwrap();
    assert!(output.status.success());

    let pairs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pairs = pairs.as_array().unwrap();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0]["leading"]["text"], "a");
    assert_eq!(pairs[1]["closing"]["text"], "c");
}

#[test]
fn writes_output_file() {
    let dir = TempDir::new().unwrap();
    let path = write_page(&dir);
    let out = dir.path().join("out.json");

    cdom_cmd()
        .arg("-o")
        .arg(&out)
        .arg(&path)
        .assert()
        .success();

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("Second line"));
}

#[test]
fn ambiguous_root_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_page(&dir);

    cdom_cmd()
        .arg("--root")
        .arg("p")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than one root found"));
}

#[test]
fn missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_page(&dir);

    cdom_cmd()
        .arg("--root")
        .arg("table")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("root node not found"));
}

#[test]
fn unknown_encoding_fails() {
    cdom_cmd()
        .arg("--encoding")
        .arg("klingon")
        .write_stdin("<p>x</p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown encoding"));
}
