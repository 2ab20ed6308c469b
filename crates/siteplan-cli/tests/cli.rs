//! CLI integration tests
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: no errors (warnings/info allowed) |
//! | 1 | Failure: errors reported, or warnings under `--strict` |

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn siteplan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_siteplan"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SITEPLAN_CONFIG")
        .output()
        .expect("failed to execute siteplan")
}

fn layout_json(extra: &[&str]) -> Value {
    let chain = fixture("chain.json");
    let mut args = vec!["layout", chain.to_str().unwrap(), "--today", "2025-03-01"];
    args.extend_from_slice(extra);

    let output = siteplan(&args);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("layout output is JSON")
}

fn row_ids(layout: &Value) -> Vec<String> {
    layout["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// layout
// =============================================================================

#[test]
fn layout_prints_rows_links_and_summary() {
    let layout = layout_json(&[]);

    assert_eq!(row_ids(&layout), vec!["shell", "found", "frame", "roof"]);
    assert_eq!(layout["timeline"]["origin"], "2025-03-03");
    assert_eq!(layout["links"].as_array().unwrap().len(), 2);

    let shell = &layout["rows"][0];
    assert_eq!(shell["is_summary"], true);
    assert_eq!(shell["left"], 350.0);
    assert_eq!(shell["width"], 400.0);
    assert!(layout["notices"].as_array().unwrap().is_empty());
}

#[test]
fn collapse_all_and_toggle_control_visibility() {
    assert_eq!(row_ids(&layout_json(&["--collapse-all"])), vec!["shell"]);
    assert_eq!(row_ids(&layout_json(&["--toggle", "shell"])), vec!["shell"]);
    assert_eq!(
        row_ids(&layout_json(&["--collapse-all", "--toggle", "shell"])).len(),
        4
    );
}

#[test]
fn layout_reads_config_and_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("siteplan.toml");
    std::fs::write(&config, "pixels_per_day = 10.0\nrow_height = 30.0\n").unwrap();
    let out = dir.path().join("layout.json");

    layout_json(&[
        "--config",
        config.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["rows"][1]["left"], 70.0);
    assert_eq!(written["rows"][1]["top"], 30.0);
}

#[test]
fn invalid_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "pixels_per_day = -5.0\n").unwrap();

    let chain = fixture("chain.json");
    let output = siteplan(&[
        "layout",
        chain.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("loading config"));
}

#[test]
fn missing_snapshot_is_an_error() {
    let output = siteplan(&["layout", "does-not-exist.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist.json"));
}

// =============================================================================
// check
// =============================================================================

#[test]
fn check_clean_snapshot() {
    let chain = fixture("chain.json");
    let output = siteplan(&["check", chain.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("ok:"));
}

#[test]
fn check_warnings_pass_unless_strict() {
    let broken = fixture("broken.json");
    let path = broken.to_str().unwrap();

    let output = siteplan(&["check", path]);
    assert_eq!(output.status.code(), Some(0));
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("warning[L003]: task 'a'"));
    assert!(text.contains("info[L004]: task 'b'"));
    assert!(text.contains("0 error(s), 2 warning(s)"));

    let strict = siteplan(&["check", path, "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn check_errors_fail() {
    let cyclic = fixture("cyclic.json");
    let output = siteplan(&["check", cyclic.to_str().unwrap(), "--format", "json"]);

    assert_eq!(output.status.code(), Some(1));
    let notices: Value = serde_json::from_slice(&output.stdout).unwrap();
    let codes: Vec<&str> = notices
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"L005"));
    assert!(codes.contains(&"L006"));
    assert!(notices.as_array().unwrap().iter().all(|n| n["severity"] == "error"));
}
