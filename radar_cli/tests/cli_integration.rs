use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid TOML config with timers short enough for a fast test run.
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[timers]
startup_delay_ms = 10
measure_period_ms = 50
upload_period_ms = 200
measure_timeout_ms = 30

[scheduler]
tick_period_ms = 5
event_queue_capacity = 10
log_capacity = 50

[transport]
access_token = "test-token"
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
#[case(&["run", "--ticks", "50"], 0, "uploads", "stdout")]
#[case(&["run", "--ticks", "5"], 0, "config loaded", "stdout")]
#[case(&["run", "--ticks", "50", "--silent"], 0, "uploads", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("radar_cli").unwrap();
    cmd.env_remove("RUST_LOG");

    // Always include a valid config to avoid relying on the default path
    cmd.arg("--config").arg(&cfg);

    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn explicit_log_level_flag_beats_config_level() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let quiet = fs::read_to_string(&cfg).unwrap() + "\n[logging]\nlevel = \"error\"\n";
    let path = dir.path().join("quiet.toml");
    fs::write(&path, quiet).unwrap();

    // Config alone silences info events.
    let mut cmd = Command::cargo_bin("radar_cli").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd.arg("--config").arg(&path).arg("run").arg("--ticks").arg("5");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("config loaded").not());

    // An explicit flag overrides the file.
    let mut cmd = Command::cargo_bin("radar_cli").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd.arg("--config")
        .arg(&path)
        .arg("--log-level")
        .arg("info")
        .arg("run")
        .arg("--ticks")
        .arg("5");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("config loaded"));
}

#[rstest]
fn missing_access_token_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    fs::write(&path, "[timers]\nstartup_delay_ms = 10\n").unwrap();

    let mut cmd = Command::cargo_bin("radar_cli").unwrap();
    cmd.arg("--config").arg(&path).arg("run").arg("--ticks").arg("1");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("access_token"));
}

#[rstest]
fn missing_config_file_is_reported() {
    let mut cmd = Command::cargo_bin("radar_cli").unwrap();
    cmd.arg("--config")
        .arg("/nonexistent/radar.toml")
        .arg("run");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[rstest]
fn json_mode_emits_structured_error() {
    let mut cmd = Command::cargo_bin("radar_cli").unwrap();
    cmd.arg("--config")
        .arg("/nonexistent/radar.toml")
        .arg("--json")
        .arg("run");
    let out = cmd.assert().failure().get_output().clone();
    let stderr = String::from_utf8_lossy(&out.stderr);
    let line = stderr.lines().find(|l| l.starts_with('{')).expect("json line");
    let v: serde_json::Value = serde_json::from_str(line).expect("valid json");
    assert!(v.get("error").is_some());
}
