//! Human-mode end-to-end tests.
//!
//! Output is piped, so colors are off and text can be matched directly.

use regex::Regex;

use crate::common::cli::CliRunner;
use crate::common::fixtures::TestEnv;

#[test]
fn quick_start_lists_commands() {
    CliRunner::new()
        .run(&[])
        .assert_success()
        .assert_stdout_contains("QUICK START")
        .assert_stdout_contains("nivasa capture")
        .assert_stdout_contains("--robot");
}

#[test]
fn capture_prints_snap_and_grid() {
    let env = TestEnv::new("");
    let result = env.cli().run(&["capture", "--count", "2"]);
    result
        .assert_success()
        .assert_stdout_contains("Gallery (2/4 captured)")
        .assert_stdout_contains("[3] (empty)")
        .assert_stdout_contains("[4] (empty)");

    let captured = Regex::new(r"\[OK\] Captured IMG_\d{8}-\d{6}(_\d+)?\.jpg \(\d/4\)").unwrap();
    assert_eq!(captured.find_iter(&result.stdout).count(), 2);
    assert!(
        Regex::new(r"\[1\] IMG_\d{8}-\d{6}")
            .unwrap()
            .is_match(&result.stdout)
    );
}

#[test]
fn oldest_first_puts_placeholders_on_top() {
    let env = TestEnv::new("");
    let result = env.cli().run(&["--order", "oldest-first", "capture"]);
    result.assert_success().assert_stdout_contains("[1] (empty)");
    assert!(
        Regex::new(r"\[4\] IMG_")
            .unwrap()
            .is_match(&result.stdout)
    );
}

#[test]
fn failed_capture_shows_warning() {
    let env = TestEnv::new("fail_every = 1\n");
    env.cli()
        .run(&["capture"])
        .assert_success()
        .assert_stdout_contains("[WARN]")
        .assert_stdout_contains("simulated sensor fault")
        .assert_stdout_contains("Gallery (0/4 captured)")
        .assert_stdout_contains("Last capture failed");
    assert!(env.snap_files().is_empty());
}

#[test]
fn error_shows_suggestion() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    CliRunner::new()
        .run(&["--config", missing.to_str().unwrap(), "config"])
        .assert_exit_code(1)
        .assert_stderr_contains("[ERR]")
        .assert_stderr_contains("Configuration file not found")
        .assert_stderr_contains("nivasa init");
}

#[test]
fn config_path_only_prints_path() {
    let env = TestEnv::new("");
    let result = env.cli().run(&["config", "--path"]);
    result.assert_success();
    assert_eq!(result.stdout.trim(), env.config_path().to_str().unwrap());
}

#[test]
fn completions_generate_script() {
    CliRunner::new()
        .run(&["completions", "bash"])
        .assert_success()
        .assert_stdout_contains("nivasa");
}
