use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{write_config, ytd};

#[test]
fn test_kimai_without_token_exits_1() {
    let out = tempfile::tempdir().unwrap();
    let cfg = write_config(out.path(), "output_dir: .\n");

    ytd()
        .args([
            "--config",
            cfg.to_str().unwrap(),
            "--out-dir",
            out.path().to_str().unwrap(),
            "kimai",
        ])
        .assert()
        .code(1)
        .stderr(contains("Missing credentials").and(contains("KIMAI_API_TOKEN")));

    assert_eq!(common::file_names(out.path()), vec!["config.yaml"]);
}

#[test]
fn test_kimai_without_base_url_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), "output_dir: .\n");

    ytd()
        .env("KIMAI_API_TOKEN", "secret-token")
        .args(["--config", cfg.to_str().unwrap(), "kimai"])
        .assert()
        .code(1)
        .stderr(contains("KIMAI_BASE_URL"))
        .stderr(contains("secret-token").not());
}

#[test]
fn test_fusion_without_client_secret_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), "output_dir: .\n");

    ytd()
        .env("SF_CLIENT_ID", "abc")
        .args(["--config", cfg.to_str().unwrap(), "fusion"])
        .assert()
        .code(1)
        .stderr(contains("SF_CLIENT_ID or SF_CLIENT_SECRET"));
}

#[test]
fn test_config_print_shows_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), "output_dir: /tmp/reports\n");

    ytd()
        .args(["--config", cfg.to_str().unwrap(), "config", "--print"])
        .assert()
        .success()
        .stdout(contains("output_dir: /tmp/reports"))
        .stdout(contains("excluded_customer: General Admin"))
        .stdout(contains("America/New_York"));
}

#[test]
fn test_config_check_rejects_bad_timezone() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), "kimai:\n  timezone: Mars/Olympus\n");

    ytd()
        .args(["--config", cfg.to_str().unwrap(), "config", "--check"])
        .assert()
        .code(1)
        .stderr(contains("Mars/Olympus"));
}

#[test]
fn test_config_check_accepts_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), "paging:\n  delay_ms: 0\n");

    ytd()
        .args(["--config", cfg.to_str().unwrap(), "config", "--check"])
        .assert()
        .success()
        .stdout(contains("Configuration is valid"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    ytd()
        .args(["--config", "/definitely/not/here.yaml", "config", "--print"])
        .assert()
        .code(1)
        .stderr(contains("configuration file not found"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), "paging: [not, a, map]\n");

    ytd()
        .args(["--config", cfg.to_str().unwrap(), "config", "--print"])
        .assert()
        .code(1)
        .stderr(contains("Failed to parse configuration"));
}
