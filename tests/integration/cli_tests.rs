use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

/// Run the binary with an empty config file so user settings don't leak in.
fn run(args: &[&str], config_dir: &TempDir) -> Output {
    let config = config_dir.path().join("config.toml");
    fs::write(&config, "").unwrap();

    Command::new(env!("CARGO_BIN_EXE_dupscan"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("DUPSCAN_DIGEST")
        .env_remove("DUPSCAN_BUCKETS")
        .env_remove("DUPSCAN_OUTPUT")
        .env_remove("DUPSCAN_HASH_COMMAND")
        .output()
        .unwrap()
}

fn make_tree() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"XXXXXXXXXX").unwrap();
    fs::write(dir.path().join("b"), b"XXXXXXXXXX").unwrap();
    fs::write(dir.path().join("c"), b"YYYYYYYYYY").unwrap();
    fs::write(dir.path().join("d"), b"ZZZZZZZZZZZZZZZZZZZZ").unwrap();
    dir
}

fn expected_line(root: &Path) -> String {
    format!(
        ">>> DUP file: {}. Original: {}.\n",
        root.join("b").display(),
        root.join("a").display()
    )
}

#[test]
fn test_cli_reports_duplicate() {
    let tree = make_tree();
    let cfg = tempdir().unwrap();

    let output = run(&[tree.path().to_str().unwrap()], &cfg);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected_line(tree.path()));
}

#[test]
fn test_cli_verbose_keeps_stdout_clean() {
    let tree = make_tree();
    let cfg = tempdir().unwrap();

    let output = run(&["-n", "-v", tree.path().to_str().unwrap()], &cfg);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected_line(tree.path()));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Regular file:"));
}

#[test]
fn test_cli_json_output() {
    let tree = make_tree();
    let cfg = tempdir().unwrap();

    let output = run(&["--output", "json", tree.path().to_str().unwrap()], &cfg);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(stdout.trim_end()).unwrap();
    assert_eq!(value["size"], 10);
}

#[test]
fn test_cli_missing_argument_is_usage_error() {
    let cfg = tempdir().unwrap();
    let output = run(&[], &cfg);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_too_many_arguments_is_usage_error() {
    let cfg = tempdir().unwrap();
    let output = run(&["/tmp", "/var"], &cfg);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_unknown_flag_is_usage_error() {
    let cfg = tempdir().unwrap();
    let output = run(&["-z", "/tmp"], &cfg);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_missing_directory_is_runtime_error() {
    let cfg = tempdir().unwrap();
    let output = run(&["/non/existent/dupscan/dir"], &cfg);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/non/existent/dupscan/dir"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_default_run_writes_nothing_to_stderr() {
    let tree = make_tree();
    let cfg = tempdir().unwrap();

    let output = run(&[tree.path().to_str().unwrap()], &cfg);

    assert_eq!(output.status.code(), Some(0));
    assert!(
        output.stderr.is_empty(),
        "unexpected stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_cli_oversized_buckets_is_usage_error() {
    let tree = make_tree();
    let cfg = tempdir().unwrap();

    let output = run(
        &["--buckets", "18446744073709551615", tree.path().to_str().unwrap()],
        &cfg,
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_largest_bucket_count_scans() {
    let tree = make_tree();
    let cfg = tempdir().unwrap();
    let max = dupscan::duplicates::MAX_BUCKETS.to_string();

    let output = run(&["--buckets", max.as_str(), tree.path().to_str().unwrap()], &cfg);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected_line(tree.path()));
}
