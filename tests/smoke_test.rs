/// Smoke tests to verify the binary runs without panicking
use std::process::{Command, Output};

fn fractree(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute cargo run")
}

#[test]
fn binary_shows_help() {
    let output = fractree(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fractree"), "Help output should mention fractree");
    assert!(stdout.contains("draw") && stdout.contains("dump"));
}

#[test]
fn binary_shows_version() {
    let output = fractree(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn dump_writes_one_command_per_line() {
    let output = fractree(&["dump", "--depth", "3", "--seed", "7"]);
    assert!(
        output.status.success(),
        "dump failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is a JSON object"))
        .collect();

    // trunk plus 2^3 - 1 branches, four pen commands each
    assert_eq!(lines.len(), 8 * 4);
    assert_eq!(lines[0]["cmd"], "set_stroke");
    assert_eq!(lines[0]["pen"], "up");
    assert_eq!(lines[1]["cmd"], "move_to");
    assert_eq!(lines[1]["x"], 5.5);
    assert_eq!(lines[1]["y"], 0.5);
    assert_eq!(lines[2]["width"], 6);
}

#[test]
fn dump_is_reproducible_with_a_seed() {
    let args = ["dump", "--depth", "5", "--color", "random", "--middle-branch", "--seed", "99"];
    let first = fractree(&args);
    let second = fractree(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn invalid_depth_is_a_configuration_error() {
    let output = fractree(&["dump", "--depth", "0"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("depth"), "stderr: {}", stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid depth should not cause panic"
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn infinite_delays_are_configuration_errors() {
    for flag in ["--wait", "--time"] {
        let output = fractree(&["draw", "--print", flag, "inf"]);

        assert_eq!(output.status.code(), Some(2), "{} inf", flag);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("panicked at"), "stderr: {}", stderr);
        assert!(output.stdout.is_empty());
    }
}

#[test]
fn unknown_color_is_rejected() {
    let output = fractree(&["dump", "--color", "plaid"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("plaid"));
    assert!(!stderr.contains("panicked at"));
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = fractree(&["nonexistent-command"]);

    // Should fail with error, not panic
    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}
