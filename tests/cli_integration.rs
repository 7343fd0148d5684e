//! Integration tests for the `veneer` CLI.
//!
//! Each test works in a temp directory, runs `veneer` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `veneer` binary.
fn veneer_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("veneer");
    path
}

fn run_veneer(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(veneer_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("VENEER_CONFIG")
        .env_remove("VENEER_OVERLAY_DELAY_MS")
        .env_remove("VENEER_HIDE_DELAY_MS")
        .env_remove("VENEER_REDUCED_MOTION")
        .env_remove("VENEER_SEED")
        .env_remove("VENEER_LOG")
        .output()
        .expect("failed to run veneer");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `veneer` expecting success, return stdout.
fn run_veneer_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_veneer(dir, args);
    if !success {
        panic!(
            "veneer {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

const EDIT_SCENARIO: &str = r#"
seed = 3

[[slot]]
id = "account-name"
value = "Conta corrente"

[[step]]
at_ms = 0
event = "before-request"
request = 1
edit = { slot = "account-name", value = "Poupança" }

[[step]]
at_ms = 150
event = "after-request"
request = 1
successful = false
headers = { "HX-Trigger" = '{"show-toast": {"message": "Erro ao salvar", "type": "error"}}' }
"#;

const NAV_SCENARIO: &str = r#"
seed = 3
until_ms = 1500

[[step]]
at_ms = 0
event = "before-request"
request = 1
boosted = true

[[step]]
at_ms = 1000
event = "after-request"
request = 1
successful = true
"#;

// ---------------------------------------------------------------------------
// mask / unmask
// ---------------------------------------------------------------------------

#[test]
fn test_mask_default_currency() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_veneer_ok(tmp.path(), &["mask", "123456"]);
    assert_eq!(out, "R$ 1.234,56\n");
}

#[test]
fn test_mask_other_currency_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_veneer_ok(tmp.path(), &["mask", "123456", "--currency", "usd", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["masked"], "$1,234.56");
    assert_eq!(json["currency"], "USD");
}

#[test]
fn test_unmask() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_veneer_ok(tmp.path(), &["unmask", "R$ 1.234,56"]);
    assert_eq!(out, "123456\n");
    let out = run_veneer_ok(tmp.path(), &["unmask", "-10,5"]);
    assert_eq!(out, "-1050\n");
}

#[test]
fn test_unmask_garbage_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_veneer(tmp.path(), &["unmask", "abc"]);
    assert!(!success);
    assert!(stderr.starts_with("error: invalid currency format"));
}

#[test]
fn test_unknown_currency_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_veneer(tmp.path(), &["mask", "1", "--currency", "XYZ"]);
    assert!(!success);
    assert!(stderr.contains("unknown currency: XYZ"));
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn test_simulate_edit_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("edit.toml"), EDIT_SCENARIO).unwrap();

    let out = run_veneer_ok(tmp.path(), &["simulate", "edit.toml"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "     0ms  account-name = \"Poupança\"");
    assert_eq!(lines[1], "     0ms  account-name marked tentative");
    assert!(lines.contains(&"   150ms  account-name = \"Conta corrente\""));
    assert!(lines.contains(&"   150ms  account-name marked error"));
    assert!(lines.contains(&"   150ms  toast-0 error \"Erro ao salvar\""));
    assert!(lines.contains(&"  2150ms  account-name unmarked"));
    assert!(lines.contains(&"  4150ms  toast-0 dismissed"));
    assert!(lines.last().unwrap().ends_with("through 5150ms"));
}

#[test]
fn test_simulate_navigation_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("nav.toml"), NAV_SCENARIO).unwrap();

    let out = run_veneer_ok(tmp.path(), &["--json", "simulate", "nav.toml"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["until_ms"], 1500);
    let effects = json["effects"].as_array().unwrap();

    let overlay_shown: Vec<u64> = effects
        .iter()
        .filter(|e| e["effect"] == "overlay" && e["visible"] == true)
        .map(|e| e["at_ms"].as_u64().unwrap())
        .collect();
    assert_eq!(overlay_shown, vec![500]);

    let bar_hidden: Vec<u64> = effects
        .iter()
        .filter(|e| e["effect"] == "bar" && e["visible"] == false)
        .map(|e| e["at_ms"].as_u64().unwrap())
        .collect();
    assert_eq!(bar_hidden, vec![1200]);
}

#[test]
fn test_simulate_is_deterministic() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("nav.toml"), NAV_SCENARIO).unwrap();
    let first = run_veneer_ok(tmp.path(), &["simulate", "nav.toml"]);
    let second = run_veneer_ok(tmp.path(), &["simulate", "nav.toml"]);
    assert_eq!(first, second);
}

#[test]
fn test_simulate_uses_config_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("nav.toml"), NAV_SCENARIO).unwrap();
    fs::write(
        tmp.path().join("veneer.toml"),
        "[navigation]\noverlay_delay_ms = 2000\n",
    )
    .unwrap();

    let out = run_veneer_ok(tmp.path(), &["simulate", "nav.toml"]);
    assert!(!out.contains("overlay shown"));
}

#[test]
fn test_simulate_until_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("nav.toml"), NAV_SCENARIO).unwrap();
    let out = run_veneer_ok(tmp.path(), &["simulate", "nav.toml", "--until-ms", "400"]);
    assert!(!out.contains("overlay"));
    assert!(out.lines().last().unwrap().ends_with("through 400ms"));
}

#[test]
fn test_simulate_bad_scenario() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("bad.toml"),
        concat!(
            "[[step]]\nat_ms = 10\nevent = \"before-unload\"\n",
            "[[step]]\nat_ms = 5\nevent = \"before-unload\"\n",
        ),
    )
    .unwrap();
    let (_, stderr, success) = run_veneer(tmp.path(), &["simulate", "bad.toml"]);
    assert!(!success);
    assert!(stderr.contains("comes before the previous step"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn test_config_init_set_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_veneer_ok(tmp.path(), &["config", "init"]);
    assert!(out.starts_with("wrote"));
    assert!(tmp.path().join("veneer.toml").exists());

    run_veneer_ok(tmp.path(), &["config", "set", "navigation.overlay_delay_ms", "750"]);
    let text = fs::read_to_string(tmp.path().join("veneer.toml")).unwrap();
    assert!(text.contains("overlay_delay_ms = 750"));
    assert!(text.contains("# veneer configuration"));

    let out = run_veneer_ok(tmp.path(), &["--json", "config", "show"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["navigation"]["overlay_delay_ms"], 750);
    assert_eq!(json["currency"]["iso_code"], "BRL");
}

#[test]
fn test_config_init_twice_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_veneer_ok(tmp.path(), &["config", "init"]);
    let (_, stderr, success) = run_veneer(tmp.path(), &["config", "init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
    run_veneer_ok(tmp.path(), &["config", "init", "--force"]);
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) =
        run_veneer(tmp.path(), &["config", "set", "navigation.warp", "9"]);
    assert!(!success);
    assert!(stderr.contains("unknown config key"));
    assert!(!tmp.path().join("veneer.toml").exists());
}

#[test]
fn test_explicit_config_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("usd.toml"), "[currency]\niso_code = \"USD\"\n").unwrap();
    let out = run_veneer_ok(tmp.path(), &["-c", "usd.toml", "mask", "99"]);
    assert_eq!(out, "$0.99\n");
}

#[test]
fn test_invalid_config_is_reported() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("veneer.toml"),
        "[navigation]\nprogress_cap = 120.0\n",
    )
    .unwrap();
    let (_, stderr, success) = run_veneer(tmp.path(), &["mask", "1"]);
    assert!(!success);
    assert!(stderr.contains("progress_cap"));
}
