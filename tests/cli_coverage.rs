#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn sortit_bin() -> PathBuf {
    let manifest_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    // `cargo llvm-cov` builds into `target/llvm-cov-target` and sets LLVM_PROFILE_FILE.
    // Use the instrumented binary in that mode so spawned subprocesses contribute to coverage.
    if std::env::var_os("LLVM_PROFILE_FILE").is_some() {
        let p = manifest_root.join("target/llvm-cov-target/debug/sortit");
        if p.exists() {
            return p;
        }
    }

    if let Some(p) = option_env!("CARGO_BIN_EXE_sortit") {
        return PathBuf::from(p);
    }

    // Normal `cargo test` path.
    manifest_root.join("target/debug/sortit")
}

fn run_sortit(args: &[&str], stdin: Option<&str>, home: &Path) -> (i32, String, String) {
    let mut cmd = Command::new(sortit_bin());
    cmd.args(args)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("SORTIT_LOG")
        .env_remove("SORTIT_LOG_LEVEL")
        .env_remove("SORTIT_LOG_FORMAT")
        .env_remove("SORTIT_LOG_FILE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().expect("spawn sortit");
    if let Some(input) = stdin {
        use std::io::Write;
        child
            .stdin
            .as_mut()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().expect("wait");
    let code = output.status.code().unwrap_or(-1);
    (
        code,
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn parse_line(line: &str) -> Vec<i64> {
    line.split_whitespace().map(|v| v.parse().unwrap()).collect()
}

fn is_sorted(values: &[i64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

#[test]
fn cli_help_and_version_work() {
    let dir = tempdir().unwrap();
    let home = dir.path();

    let (code, out, _err) = run_sortit(&["--help"], None, home);
    assert_eq!(code, 0);
    assert!(out.contains("bubble"));
    assert!(out.contains("quick"));

    let (code, out, _err) = run_sortit(&["--version"], None, home);
    assert_eq!(code, 0);
    assert!(out.trim().starts_with("sortit"));
}

#[test]
fn cli_bubble_values_prints_every_swap() {
    let dir = tempdir().unwrap();
    let (code, out, err) = run_sortit(&["bubble", "--values", "5,3,8,1"], None, dir.path());
    assert_eq!(code, 0, "stderr: {}", err);
    assert_eq!(
        out,
        "5 3 8 1 \n3 5 8 1 \n3 5 1 8 \n3 1 5 8 \n1 3 5 8 \n"
    );
}

#[test]
fn cli_bubble_prompts_for_length() {
    let dir = tempdir().unwrap();
    let (code, out, err) = run_sortit(&["bubble", "--seed", "3"], Some("8\n"), dir.path());
    assert_eq!(code, 0, "stderr: {}", err);
    assert!(out.starts_with("Enter the array length: "));

    let body = out.trim_start_matches("Enter the array length: ");
    let lines: Vec<&str> = body.lines().collect();
    let first = parse_line(lines[0]);
    let last = parse_line(lines[lines.len() - 1]);
    assert_eq!(first.len(), 8);
    assert!(first.iter().all(|v| (0..300).contains(v)));
    assert!(is_sorted(&last));
}

#[test]
fn cli_bubble_bad_length_fails() {
    let dir = tempdir().unwrap();
    let (code, _out, err) = run_sortit(&["bubble"], Some("plenty\n"), dir.path());
    assert_eq!(code, 1);
    assert!(err.contains("'plenty'"));
}

#[test]
fn cli_merge_defaults_to_fifty_values() {
    let dir = tempdir().unwrap();
    let (code, out, err) = run_sortit(&["merge", "--seed", "99"], None, dir.path());
    assert_eq!(code, 0, "stderr: {}", err);

    let lines: Vec<&str> = out.lines().collect();
    // the startin' array plus one snapshot per merge (n - 1 merges)
    assert_eq!(lines.len(), 50);
    let first = parse_line(lines[0]);
    assert_eq!(first.len(), 50);
    assert!(first.iter().all(|v| (1..=200).contains(v)));
    assert!(is_sorted(&parse_line(lines[49])));
}

#[test]
fn cli_same_seed_same_output() {
    let dir = tempdir().unwrap();
    let (_, a, _) = run_sortit(&["quick", "--seed", "7", "--size", "30"], None, dir.path());
    let (_, b, _) = run_sortit(&["quick", "--seed", "7", "--size", "30"], None, dir.path());
    assert_eq!(a, b);
    assert!(is_sorted(&parse_line(a.lines().last().unwrap())));
}

#[test]
fn cli_quick_quiet_json_and_negative_values() {
    let dir = tempdir().unwrap();
    let (code, out, err) = run_sortit(
        &["quick", "--values", "-3,10,-7,0", "--quiet", "--format", "json"],
        None,
        dir.path(),
    );
    assert_eq!(code, 0, "stderr: {}", err);
    assert_eq!(
        out,
        "{\"step\":0,\"array\":[-3,10,-7,0]}\n{\"step\":1,\"array\":[-7,-3,0,10]}\n"
    );
}

#[test]
fn cli_trace_and_stats_go_to_stderr() {
    let dir = tempdir().unwrap();
    let (code, out, err) = run_sortit(
        &["quick", "--values", "3,1,2", "--trace", "--stats"],
        None,
        dir.path(),
    );
    assert_eq!(code, 0);
    assert_eq!(out, "3 1 2 \n1 2 3 \n");
    assert!(err.contains("pivot 2 lands at [1]"));
    assert!(err.contains("quick: 3 elements"));
    // NO_COLOR is set, so nae escape codes
    assert!(!err.contains('\x1b'));
}

#[test]
fn cli_range_and_value_errors() {
    let dir = tempdir().unwrap();
    let home = dir.path();

    let (code, _, err) = run_sortit(&["merge", "--low", "10", "--high", "2"], None, home);
    assert_eq!(code, 1);
    assert!(err.contains("--low"));

    let (code, _, err) = run_sortit(&["merge", "--values", "1,two"], None, home);
    assert_eq!(code, 1);
    assert!(err.contains("'two'"));

    let (code, _, _) = run_sortit(&["quick", "--quiet", "--trace"], None, home);
    assert_eq!(code, 2);
}

#[test]
fn cli_values_clash_with_generation_flags() {
    let dir = tempdir().unwrap();
    let home = dir.path();
    for extra in [
        ["--size", "4"],
        ["--seed", "1"],
        ["--low", "0"],
        ["--high", "9"],
    ] {
        let mut args = vec!["merge", "--values", "3,1,2"];
        args.extend_from_slice(&extra);
        let (code, out, err) = run_sortit(&args, None, home);
        assert_eq!(code, 2, "{:?} should clash wi' --values", extra);
        assert!(out.is_empty());
        assert!(err.contains("cannot be used with"), "stderr: {}", err);
    }
}

#[test]
fn cli_bubble_json_prompt_goes_to_stderr() {
    let dir = tempdir().unwrap();
    let (code, out, err) = run_sortit(
        &["bubble", "--seed", "1", "--format", "json"],
        Some("5\n"),
        dir.path(),
    );
    assert_eq!(code, 0, "stderr: {}", err);
    assert!(err.starts_with("Enter the array length: "));
    for line in out.lines() {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(parsed["array"].as_array().unwrap().len(), 5);
    }
}

#[test]
fn cli_allocation_failure_exits_non_zero() {
    let dir = tempdir().unwrap();
    let size = usize::MAX.to_string();
    let (code, out, err) = run_sortit(&["merge", "--size", &size], None, dir.path());
    assert_eq!(code, 1);
    assert!(out.is_empty());
    assert!(err.contains("Couldnae allocate"));
}

#[test]
fn cli_bench_table_and_json() {
    let dir = tempdir().unwrap();
    let home = dir.path();

    let (code, out, err) = run_sortit(&["bench", "--size", "64", "--seed", "5"], None, home);
    assert_eq!(code, 0, "stderr: {}", err);
    assert!(out.contains("seed 5"));
    for name in ["bubble", "merge", "quick"] {
        assert!(out.lines().any(|l| l.starts_with(name)), "missing {}", name);
    }

    let (code, out, _) = run_sortit(
        &["bench", "--size", "16", "--seed", "5", "--only", "merge,quick", "--format", "json"],
        None,
        home,
    );
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["algorithm"], "merge");
    assert_eq!(rows[1]["sorted"], true);
}

#[test]
fn cli_log_filter_env_reaches_stderr() {
    let dir = tempdir().unwrap();
    let output = Command::new(sortit_bin())
        .args(["merge", "--values", "2,1"])
        .env("HOME", dir.path())
        .env("NO_COLOR", "1")
        .env("SORTIT_LOG", "mutter")
        .output()
        .expect("run sortit");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stdout, "2 1 \n1 2 \n");
    assert!(stderr.contains("[MUTTER"));
    assert!(stderr.contains("sort finished"));

    let output = Command::new(sortit_bin())
        .args(["merge", "--values", "2,1"])
        .env("SORTIT_LOG", "sortit=blootered")
        .env_remove("SORTIT_LOG_LEVEL")
        .output()
        .expect("run sortit");
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid log filter"));
}

#[test]
fn cli_log_file_keeps_stdout_and_stderr_clean() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("sortit.log");
    let output = Command::new(sortit_bin())
        .args(["quick", "--values", "2,1"])
        .env("HOME", dir.path())
        .env("NO_COLOR", "1")
        .env("SORTIT_LOG", "mutter")
        .env("SORTIT_LOG_FORMAT", "json")
        .env("SORTIT_LOG_FILE", &log_path)
        .output()
        .expect("run sortit");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2 1 \n1 2 \n");
    assert!(output.stderr.is_empty());

    let contents = std::fs::read_to_string(&log_path).unwrap();
    let records: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(records.iter().any(|r| r["msg"] == "sort finished"));
    assert!(records.iter().all(|r| r["level"].is_string()));

    let output = Command::new(sortit_bin())
        .args(["quick", "--values", "2,1"])
        .env("SORTIT_LOG_FORMAT", "yaml")
        .env_remove("SORTIT_LOG")
        .env_remove("SORTIT_LOG_FILE")
        .output()
        .expect("run sortit");
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid log format"));
}
