//! Integration test for the `decode_states` example.
//!
//! Expectation: one input line per state index, one tab-separated output
//! line per index, digits matching the Taxi-v3 layout.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn write_temp_indices() -> std::path::PathBuf {
    let tmp =
        std::env::temp_dir().join(format!("qview_decode_test_{}.txt", std::process::id()));
    fs::write(&tmp, "0\n479\n")
        .unwrap_or_else(|e| panic!("failed to write temp index file: {e}"));
    tmp
}

#[test]
fn example_decode_states_prints_digits_per_line() {
    let path = write_temp_indices();
    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "--package",
        "qview-core",
        "--example",
        "decode_states",
        "--",
        path.to_str()
            .unwrap_or_else(|| panic!("temp path is not valid UTF-8: {:?}", path)),
    ]);

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("0\t0\t0\t0\t0")
                .and(predicate::str::contains("479\t4\t3\t4\t3")),
        );
}

#[test]
fn example_decode_states_accepts_stdin() {
    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "--package",
        "qview-core",
        "--example",
        "decode_states",
    ]);
    cmd.write_stdin("42\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("42\t0\t2\t0\t2"));
}

#[test]
fn example_decode_states_fails_on_out_of_range_index() {
    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "--package",
        "qview-core",
        "--example",
        "decode_states",
    ]);
    cmd.write_stdin("500\n");

    cmd.assert().failure();
}
