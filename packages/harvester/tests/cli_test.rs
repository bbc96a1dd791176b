//! Command-line tests for the offline subcommands.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("lexml")
        .join(name)
}

fn harvester() -> Command {
    Command::cargo_bin("lexml-harvester").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    harvester()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("convert"));
}

#[test]
fn test_convert_prints_json() {
    harvester()
        .arg("convert")
        .arg(fixture_path("page_date_2019.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"url\": \"https://www.lexml.gov.br/urn/urn:lex:br:federal:lei:2019\"",
        ));
}

#[test]
fn test_convert_writes_output_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("leis.json");

    harvester()
        .arg("convert")
        .arg(fixture_path("page_date_2019.xml"))
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 record(s)"));

    assert!(out.exists());
}

#[test]
fn test_convert_missing_field_fails() {
    harvester()
        .arg("convert")
        .arg(fixture_path("missing_urn.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing field 'urn'"));
}

#[test]
fn test_convert_lenient_skips() {
    harvester()
        .arg("convert")
        .arg(fixture_path("missing_urn.xml"))
        .arg("--lenient")
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"))
        .stderr(predicate::str::contains("Skipped:"));
}

#[test]
fn test_search_rejects_zero_page_size() {
    harvester()
        .args(["search", "date=2019", "--page-size", "0", "--name", "leis"])
        .env("LEXML_SRU_URL", "http://127.0.0.1:9/SRU")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid page size"));
}

#[test]
fn test_search_rejects_zero_max_pages() {
    harvester()
        .args(["search", "date=2019", "--max-pages", "0"])
        .env("LEXML_SRU_URL", "http://127.0.0.1:9/SRU")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-pages"));
}
