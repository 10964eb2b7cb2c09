//! CLI help smoke tests.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn help_lists_commands() {
    cargo_bin_cmd!("vocabify")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hunt"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn hunt_help_lists_parameters() {
    cargo_bin_cmd!("vocabify")
        .args(["hunt", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--topic"))
        .stdout(predicate::str::contains("--difficulty"))
        .stdout(predicate::str::contains("--length"))
        .stdout(predicate::str::contains("--weakness"));
}

#[test]
fn hunt_requires_topic() {
    cargo_bin_cmd!("vocabify").arg("hunt").assert().failure();
}
