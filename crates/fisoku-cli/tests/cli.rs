use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECEIPT: &str = "ÖRNEK MARKET A.Ş.\n\
                       MAH. CAD. NO:5\n\
                       19.03.2024 14:22:10\n\
                       VKN: 1234567890\n\
                       EKMEK 5,50\n\
                       TOPLAM TUTAR: 156,75\n";

fn fisoku() -> Command {
    Command::cargo_bin("fisoku").unwrap()
}

/// Temp dir holding a freshly initialised config file.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fisoku()
        .args(["-c", config.to_str().unwrap(), "config", "init"])
        .assert()
        .success();
    (dir, config)
}

fn write_receipt(dir: &Path) -> PathBuf {
    let path = dir.join("receipt.txt");
    fs::write(&path, RECEIPT).unwrap();
    path
}

#[test]
fn parse_prints_json_fields() {
    let (dir, config) = workspace();
    let input = write_receipt(dir.path());

    fisoku()
        .args(["-c", config.to_str().unwrap(), "parse", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1234567890"))
        .stdout(predicate::str::contains("156.75"))
        .stdout(predicate::str::contains("ÖRNEK MARKET A.Ş."));
}

#[test]
fn parse_reads_stdin() {
    let (_dir, config) = workspace();

    fisoku()
        .args(["-c", config.to_str().unwrap(), "parse", "-"])
        .write_stdin(RECEIPT)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tax_number\""))
        .stdout(predicate::str::contains("1234567890"));
}

#[test]
fn parse_text_format() {
    let (dir, config) = workspace();
    let input = write_receipt(dir.path());

    fisoku()
        .args(["-c", config.to_str().unwrap(), "parse", "-f", "text", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tax no:  1234567890"))
        .stdout(predicate::str::contains("Total: 156.75"));
}

#[test]
fn parse_writes_output_file() {
    let (dir, config) = workspace();
    let input = write_receipt(dir.path());
    let output = dir.path().join("out.csv");

    fisoku()
        .args([
            "-c",
            config.to_str().unwrap(),
            "parse",
            "-f",
            "csv",
            "-o",
            output.to_str().unwrap(),
            input.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("company_name,date,total_amount"));
    assert!(written.contains("1234567890"));
}

#[test]
fn config_path_reports_location() {
    let (_dir, config) = workspace();

    fisoku()
        .args(["-c", config.to_str().unwrap(), "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file:"))
        .stdout(predicate::str::contains("exists"));
}

#[test]
fn config_set_then_get() {
    let (_dir, config) = workspace();
    let config = config.to_str().unwrap();

    fisoku()
        .args(["-c", config, "config", "set", "ocr.language", "eng"])
        .assert()
        .success();

    fisoku()
        .args(["-c", config, "config", "get", "ocr.language"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"eng\""));
}

#[test]
fn config_init_refuses_overwrite() {
    let (_dir, config) = workspace();

    fisoku()
        .args(["-c", config.to_str().unwrap(), "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn process_missing_input_fails() {
    let (dir, config) = workspace();
    let missing = dir.path().join("nope.png");

    fisoku()
        .args(["-c", config.to_str().unwrap(), "process", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_without_matches_fails() {
    let (dir, config) = workspace();
    let pattern = format!("{}/*.png", dir.path().display());

    fisoku()
        .args(["-c", config.to_str().unwrap(), "batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}
