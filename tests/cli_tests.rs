//! End-to-end tests for the eyesaver binary.
//!
//! - Help and version output
//! - Argument validation
//! - Shell completion generation
//! - A short interactive session over stdin (non-macOS only; the native
//!   notification center needs a bundled, signed app)

use assert_cmd::Command;
use predicates::prelude::*;

fn eyesaver() -> Command {
    Command::cargo_bin("eyesaver").unwrap()
}

#[test]
fn help_lists_subcommands() {
    eyesaver()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_is_printed() {
    eyesaver()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn minutes_out_of_range_is_rejected() {
    eyesaver()
        .args(["run", "--minutes", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("minutes"));
}

#[test]
fn completions_for_bash() {
    eyesaver()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("eyesaver"));
}

#[cfg(not(target_os = "macos"))]
#[test]
fn interactive_session_adjusts_and_quits() {
    eyesaver()
        .args(["run", "--json"])
        .write_stdin("+\n?\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":"adjusted","remaining_seconds":1560"#))
        .stdout(predicate::str::contains(r#""remaining_seconds":1560"#));
}

#[cfg(not(target_os = "macos"))]
#[test]
fn unknown_command_reports_error_and_continues() {
    eyesaver()
        .args(["run", "--json"])
        .write_stdin("pause\nq\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown command 'pause'"));
}
