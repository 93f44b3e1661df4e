//! Integration tests for arcwatch-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use arcwatch_core::test_utils::create_test_zip;
use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn arcwatch_cmd() -> Command {
    cargo_bin_cmd!("arcwatch")
}

/// `Downloads/ReleaseA/game.zip` plus an empty `Installations/`.
struct Fixture {
    _temp: TempDir,
    archive: PathBuf,
    installs: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let release = temp.path().join("Downloads").join("ReleaseA");
        let installs = temp.path().join("Installations");
        fs::create_dir_all(&release).unwrap();
        fs::create_dir_all(&installs).unwrap();

        let archive = release.join("game.zip");
        fs::write(
            &archive,
            create_test_zip(&[("game.exe", "MZ"), ("data/level.pak", "lvl")]),
        )
        .unwrap();

        Self {
            _temp: temp,
            archive,
            installs,
        }
    }
}

#[test]
fn test_version_flag() {
    arcwatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("arcwatch"));
}

#[test]
fn test_help_flag() {
    arcwatch_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn test_watch_help() {
    arcwatch_cmd()
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--launcher-config"))
        .stdout(predicate::str::contains("--retry-interval"));
}

#[test]
fn test_extract_into_release_folder() {
    let fx = Fixture::new();

    arcwatch_cmd()
        .arg("extract")
        .arg(&fx.archive)
        .arg("--dest")
        .arg(&fx.installs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted"))
        .stdout(predicate::str::contains("Files extracted: 2"));

    let release = fx.installs.join("ReleaseA");
    assert_eq!(fs::read_to_string(release.join("game.exe")).unwrap(), "MZ");
    assert_eq!(
        fs::read_to_string(release.join("data/level.pak")).unwrap(),
        "lvl"
    );
}

#[test]
fn test_extract_json_output() {
    let fx = Fixture::new();

    let output = arcwatch_cmd()
        .arg("--json")
        .arg("extract")
        .arg(&fx.archive)
        .arg("--dest")
        .arg(&fx.installs)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is one JSON document");
    assert_eq!(value["operation"], "extract");
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["format"], "zip");
    assert_eq!(value["data"]["files_extracted"], 2);
    assert_eq!(value["data"]["attempts"], 1);
}

#[test]
fn test_extract_non_archive_is_skipped() {
    let fx = Fixture::new();
    let readme = fx.archive.with_file_name("readme.nfo");
    fs::write(&readme, "greetings").unwrap();

    arcwatch_cmd()
        .args(["--json", "extract"])
        .arg(&readme)
        .arg("--dest")
        .arg(&fx.installs)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"skipped""#))
        .stdout(predicate::str::contains(r#""reason":"unrecognized""#));

    assert!(!fx.installs.join("ReleaseA").exists());
}

#[test]
fn test_extract_missing_archive() {
    let fx = Fixture::new();

    arcwatch_cmd()
        .arg("extract")
        .arg(fx.archive.with_file_name("missing.zip"))
        .arg("--dest")
        .arg(&fx.installs)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Archive not found"));
}

#[test]
fn test_extract_missing_destination() {
    let fx = Fixture::new();

    arcwatch_cmd()
        .arg("extract")
        .arg(&fx.archive)
        .arg("--dest")
        .arg(fx.installs.join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("HINT"))
        .stderr(predicate::str::contains("Create it first"));
}

#[test]
fn test_extract_requires_dest() {
    let fx = Fixture::new();

    arcwatch_cmd()
        .arg("extract")
        .arg(&fx.archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dest"));
}

#[test]
fn test_extract_rejects_zero_attempts() {
    let fx = Fixture::new();

    arcwatch_cmd()
        .arg("extract")
        .arg(&fx.archive)
        .arg("--dest")
        .arg(&fx.installs)
        .args(["--max-attempts", "0"])
        .assert()
        .failure();
}

#[test]
fn test_watch_missing_source() {
    let fx = Fixture::new();

    arcwatch_cmd()
        .args(["watch", "--source"])
        .arg(fx.installs.join("no-such-downloads"))
        .arg("--dest")
        .arg(&fx.installs)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not usable"))
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_watch_launcher_config_without_root_path() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("user");
    fs::write(&config, "Theme=dark\n").unwrap();

    arcwatch_cmd()
        .arg("watch")
        .arg("--launcher-config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No RootPath"));
}

#[test]
fn test_completion_bash() {
    arcwatch_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("arcwatch"));
}
