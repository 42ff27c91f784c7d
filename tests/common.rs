#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use ytd_extract::config::Config;
use ytd_extract::core::RunContext;
use ytd_extract::models::date_range::DateRange;

/// Binary under test with every credential variable removed, so tests never
/// depend on the caller's environment.
pub fn ytd() -> Command {
    let mut cmd = cargo_bin_cmd!("ytd-extract");
    for var in [
        "KIMAI_API_TOKEN",
        "KIMAI_BASE_URL",
        "SF_CLIENT_ID",
        "SF_CLIENT_SECRET",
        "SF_BASE_URL",
        "DATE_RANGE",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Fixed run date so file names and the recency window are predictable.
pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

pub fn context(out_dir: &Path) -> RunContext {
    let today = run_date();
    RunContext {
        range: DateRange::YearToDate,
        today,
        now: today.and_hms_opt(6, 30, 0).unwrap(),
        out_dir: out_dir.to_string_lossy().to_string(),
    }
}

/// Config pointed at a mock server with no inter-page delay.
pub fn mock_config(base_url: &str) -> Config {
    let mut cfg = Config::default();
    cfg.kimai.base_url = Some(base_url.to_string());
    cfg.fusion.base_url = base_url.to_string();
    cfg.paging.delay_ms = 0;
    cfg.paging.timeout_secs = 5;
    cfg
}

/// Write a YAML config file into `dir` and return its path.
pub fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    fs::write(&path, yaml).expect("write config");
    path
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read output dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
