//! CLI behavior tests for the `sift` binary.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use assert_cmd::Command;
use predicates::prelude::*;

fn sift() -> Command {
    Command::cargo_bin("sift").unwrap()
}

#[test]
fn serializes_a_query_to_json_by_default() {
    sift()
        .arg("marina +section:commentisfree")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"queryResult\": \"q=marina&section=commentisfree\"",
        ));
}

#[test]
fn prints_tokens_with_positions() {
    sift()
        .args(["--tokens", "+tag:"])
        .assert()
        .success()
        .stdout(predicate::str::contains("QueryFieldKey"))
        .stdout(predicate::str::contains("4-4"))
        .stdout(predicate::str::contains("Eof"));
}

#[test]
fn prints_the_parse_tree() {
    sift()
        .args(["--tree", "(hyde OR abramovic)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Group"))
        .stdout(predicate::str::contains("OR"));
}

#[test]
fn parse_error_exits_nonzero_with_caret() {
    sift()
        .arg("marina AND")
        .assert()
        .failure()
        .stderr(predicate::str::contains("query syntax error"))
        .stderr(predicate::str::contains("^"));
}

#[test]
fn missing_field_value_exits_nonzero_naming_the_key() {
    sift()
        .arg("+tag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'+tag'"));
}

#[test]
fn registered_fields_drive_suggestions() {
    sift()
        .args(["--field", "section=sport,culture", "+section:cul"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"culture\""));
}

#[test]
fn invalid_field_spec_is_rejected() {
    sift()
        .args(["--field", "nonsense", "marina"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --field spec"));
}
