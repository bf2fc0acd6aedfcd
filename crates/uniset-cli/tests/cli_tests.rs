//! CLI end-to-end tests driving the built `uniset` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn uniset_cmd() -> Command {
    Command::cargo_bin("uniset").expect("binary builds")
}

#[test]
fn test_help_flag() {
    let mut cmd = uniset_cmd();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage: uniset"));
}

#[test]
fn test_rebuilds_simple_range() {
    let mut cmd = uniset_cmd();
    cmd.arg("[a-z]");
    cmd.assert().success().stdout(predicate::str::diff("[a-z]\n"));
}

#[test]
fn test_rebuilds_complement_in_shorter_form() {
    let mut cmd = uniset_cmd();
    cmd.arg("[^a-cA-C]");
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("[^A-Ca-c]\n"));
}

#[test]
fn test_reads_pattern_from_stdin() {
    let mut cmd = uniset_cmd();
    cmd.write_stdin("[a-z]\n");
    cmd.assert().success().stdout(predicate::str::diff("[a-z]\n"));
}

#[test]
fn test_list_flag_prints_members() {
    let mut cmd = uniset_cmd();
    cmd.args(["--list", "[ac]"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("U+0061"))
        .stdout(predicate::str::contains("U+0063"));
}

#[test]
fn test_malformed_pattern_is_an_error() {
    let mut cmd = uniset_cmd();
    cmd.arg("[x-a]");
    cmd.assert().failure().stderr(predicate::str::contains("error:"));
}

#[test]
fn test_unrecognised_option_is_an_error() {
    let mut cmd = uniset_cmd();
    cmd.arg("--not-a-real-flag");
    cmd.assert().failure();
}

#[test]
fn test_ignore_space_flag_allows_whitespace() {
    let mut cmd = uniset_cmd();
    cmd.args(["--ignore-space", "[ a - z ]"]);
    cmd.assert().success().stdout(predicate::str::diff("[a-z]\n"));
}
