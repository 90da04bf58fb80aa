//! Integration tests for the command line
//!
//! These run the built binary against `fixtures/sample.json` and verify:
//! - Headless ranking output, both JSON and text
//! - Argument errors reported with a failing exit status
//! - Configuration file validation

use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample.json")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_laptop-picker"))
        .args(args)
        .env_remove("LAPTOP_PICKER_URL")
        .env_remove("LAPTOP_PICKER_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run laptop-picker")
}

fn rank(args: &[&str]) -> Output {
    let fixtures = fixtures();
    let mut all = vec!["rank", "--fixtures", fixtures.to_str().unwrap()];
    all.extend_from_slice(args);
    run(&all)
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// =============================================================================
// rank
// =============================================================================

#[test]
fn test_rank_json_applies_budget() {
    let output = rank(&["--budget", "p2", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let items: Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = items.as_array().unwrap();
    let ids: Vec<i64> = items.iter().map(|i| i["id"].as_i64().unwrap()).collect();
    // 42 million is inside 30..=50; the laptop without a listing is always kept
    assert_eq!(ids, vec![3, 5]);
    assert_eq!(items[0]["price_million"], 42);
    assert!(items[1].get("price_million").is_none());
    assert_eq!(items[0]["specs"]["cpu_name"], "Ryzen 5 7535HS");
}

#[test]
fn test_rank_json_is_sorted_by_score() {
    let output = rank(&["--json"]);
    assert!(output.status.success());

    let items: Value = serde_json::from_slice(&output.stdout).unwrap();
    let scores: Vec<u64> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["score"].as_u64().unwrap())
        .collect();
    assert_eq!(scores, vec![100, 75, 58, 31, 7]);
}

#[test]
fn test_rank_text_summary_and_limit() {
    let output = rank(&["--category", "programming", "--limit", "2"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "5 laptops for Programming at Doesn't matter (showing 2)"
    );
    assert!(lines[1].contains("ASUS ROG Zephyrus G14"));
    assert!(lines[1].contains("100%"));
    assert!(lines[2].contains("Lenovo Legion Slim 5"));
}

#[test]
fn test_rank_unknown_budget_fails() {
    let output = rank(&["--budget", "p9"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown budget 'p9'"));
}

#[test]
fn test_rank_unknown_category_fails() {
    let output = rank(&["--category", "astronomy"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown category 'astronomy'"));
}

#[test]
fn test_rank_without_backend_fails() {
    let output = run(&["rank"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Backend URL must be specified"));
}

// =============================================================================
// check-config
// =============================================================================

#[test]
fn test_check_config_accepts_valid_file() {
    let file = config_file(
        r#"{"backend": {"url": "https://example.supabase.co", "api_key": "anon"}, "admin": {"paging": {"laptops": "server"}}}"#,
    );
    let output = run(&["check-config", file.path().to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuration file is valid"));
}

#[test]
fn test_check_config_rejects_missing_key() {
    let file = config_file(r#"{"backend": {"url": "https://example.supabase.co"}}"#);
    let output = run(&["check-config", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("API key"));
}

#[test]
fn test_check_config_rejects_unknown_tab() {
    let file = config_file(
        r#"{"backend": {"url": "http://localhost:3000", "api_key": "k"}, "admin": {"paging": {"monitors": "client"}}}"#,
    );
    let output = run(&["check-config", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown admin tab 'monitors'"));
}
