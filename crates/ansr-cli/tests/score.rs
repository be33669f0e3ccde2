use assert_cmd::cargo::cargo_bin_cmd;
use serde::Deserialize;
use std::{error::Error, fs, path::PathBuf};

#[derive(Deserialize)]
struct TableOutput {
    time: Vec<f64>,
    ecg: Vec<f64>,
    resp: Vec<f64>,
    gsr: Vec<f64>,
    stress_score: Vec<f64>,
}

#[test]
fn score_prints_the_table_and_writes_csv() -> Result<(), Box<dyn Error>> {
    let fixture = sample_path("test_data/stress_session.csv");
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("scored.csv");

    let mut cmd = cargo_bin_cmd!("ansr");
    cmd.args([
        "score",
        "--data",
        &fixture,
        "--sample-rate",
        "256",
        "--time-window",
        "4",
        "--out",
        out.to_str().expect("utf8 path"),
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let table: TableOutput = serde_json::from_slice(&output)?;

    assert_eq!(table.time, vec![0.0, 4.0, 8.0, 12.0, 16.0]);
    for column in [&table.ecg, &table.resp, &table.gsr, &table.stress_score] {
        assert_eq!(column.len(), 5);
        assert!(column
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0 && *v <= 1.0 + 1e-9));
    }

    let content = fs::read_to_string(&out)?;
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("TIME,ECG,RESP,GSR,Stress_Score"));
    assert_eq!(lines.count(), 5);
    Ok(())
}

#[test]
fn gsr_only_weights_reproduce_the_gsr_column() -> Result<(), Box<dyn Error>> {
    let fixture = sample_path("test_data/stress_session.csv");
    let mut cmd = cargo_bin_cmd!("ansr");
    cmd.args([
        "score",
        "--data",
        &fixture,
        "--sample-rate",
        "256",
        "--time-window",
        "4",
        "--weights",
        "ECG=0,GSR=1,RESP=0",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let table: TableOutput = serde_json::from_slice(&output)?;
    for (score, gsr) in table.stress_score.iter().zip(&table.gsr) {
        assert!((score - gsr).abs() < 1e-12);
    }
    Ok(())
}

#[test]
fn one_window_recordings_normalize_to_zero() -> Result<(), Box<dyn Error>> {
    // 5120 rows at 512 Hz with a 10 s window is exactly one window, and a
    // single-entry column rescales to (v - v) / v.
    let fixture = sample_path("test_data/stress_session.csv");
    let mut cmd = cargo_bin_cmd!("ansr");
    cmd.args([
        "score",
        "--data",
        &fixture,
        "--sample-rate",
        "512",
        "--time-window",
        "10",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let table: TableOutput = serde_json::from_slice(&output)?;
    assert_eq!(table.time, vec![0.0]);
    assert_eq!(table.ecg, vec![0.0]);
    assert_eq!(table.resp, vec![0.0]);
    assert_eq!(table.gsr, vec![0.0]);
    assert_eq!(table.stress_score, vec![0.0]);
    Ok(())
}

#[test]
fn bad_weight_sums_are_rejected() {
    let fixture = sample_path("test_data/stress_session.csv");
    let mut cmd = cargo_bin_cmd!("ansr");
    cmd.args([
        "score",
        "--data",
        &fixture,
        "--weights",
        "ECG=0.5,GSR=0.6,RESP=0.1",
    ]);
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("sum to 1"), "stderr: {}", stderr);
}

#[test]
fn misordered_weight_names_are_rejected() {
    let fixture = sample_path("test_data/stress_session.csv");
    let mut cmd = cargo_bin_cmd!("ansr");
    cmd.args([
        "score",
        "--data",
        &fixture,
        "--weights",
        "GSR=0.3,ECG=0.3,RESP=0.4",
    ]);
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("ECG, GSR, RESP"), "stderr: {}", stderr);
}

#[test]
fn missing_recordings_are_reported() {
    let mut cmd = cargo_bin_cmd!("ansr");
    cmd.args(["score", "--data", "/nonexistent/session.csv"]);
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("does not exist"), "stderr: {}", stderr);
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .expect("crates dir")
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

fn sample_path(relative: &str) -> String {
    workspace_root()
        .join(relative)
        .to_string_lossy()
        .to_string()
}
