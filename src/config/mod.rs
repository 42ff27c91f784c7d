use crate::core::breaks::BreakPolicy;
use crate::errors::{AppError, AppResult};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod credentials;

pub use credentials::{FusionCredentials, KimaiCredentials};

/// Customers that must always get their own sheet in the Kimai workbook.
pub const DEFAULT_ROSTER: [&str; 11] = [
    "Bluewater Operations",
    "Construction",
    "DUKE",
    "Fire Dragon",
    "Flock",
    "General Admin",
    "Lumen",
    "Redspeed",
    "SCC- Miami Dade",
    "TECO",
    "TDS",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub output_dir: String,
    pub kimai: KimaiConfig,
    pub fusion: FusionConfig,
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KimaiConfig {
    /// Usually supplied through KIMAI_BASE_URL instead.
    pub base_url: Option<String>,
    pub auth_user: String,
    pub permission: String,
    pub timezone: String,
    pub roster: Vec<String>,
    pub excluded_customer: String,
    pub breaks: BreakPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FusionConfig {
    pub base_url: String,
    pub due_days: i64,
    pub amount_tolerance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PagingConfig {
    pub max_records: usize,
    pub max_pages: u32,
    pub delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            kimai: KimaiConfig::default(),
            fusion: FusionConfig::default(),
            paging: PagingConfig::default(),
        }
    }
}

impl Default for KimaiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_user: "API".to_string(),
            permission: "view_user, view_other_timesheet, full".to_string(),
            timezone: "America/New_York".to_string(),
            roster: DEFAULT_ROSTER.iter().map(|s| s.to_string()).collect(),
            excluded_customer: "General Admin".to_string(),
            breaks: BreakPolicy::default(),
        }
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.servicefusion.com".to_string(),
            due_days: 15,
            amount_tolerance: 0.1,
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_records: 50_000,
            max_pages: 500,
            delay_ms: 100,
            timeout_secs: 30,
        }
    }
}

impl PagingConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl KimaiConfig {
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::InvalidTimezone(self.timezone.clone()))
    }

    /// Roster sheets in order, without the excluded customer.
    pub fn report_roster(&self) -> Vec<String> {
        self.roster
            .iter()
            .filter(|c| **c != self.excluded_customer)
            .cloned()
            .collect()
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ytd-extract")
    }

    /// Return the full path of the default config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Load configuration from an explicit path, the default location, or
    /// fall back to built-in defaults when no file exists.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(AppError::Config(format!(
                        "configuration file not found: {}",
                        p.display()
                    )));
                }
                p.to_path_buf()
            }
            None => Self::config_file(),
        };

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            tracing::debug!(path = %path.display(), "loaded configuration file");
            serde_yaml::from_str(&content)?
        } else {
            Config::default()
        };

        cfg.apply_env();
        Ok(cfg)
    }

    /// Environment wins over the file for base URLs.
    fn apply_env(&mut self) {
        if let Some(url) = non_empty_env("KIMAI_BASE_URL") {
            self.kimai.base_url = Some(url);
        }
        if let Some(url) = non_empty_env("SF_BASE_URL") {
            self.fusion.base_url = url;
        }
    }

    /// Problems that would make a run misbehave; empty when the config is usable.
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.kimai.tz().is_err() {
            problems.push(format!("kimai.timezone: unknown zone '{}'", self.kimai.timezone));
        }
        if self.kimai.roster.is_empty() {
            problems.push("kimai.roster: no customers listed".to_string());
        }
        for customer in &self.kimai.roster {
            if customer.chars().count() > 31 {
                problems.push(format!(
                    "kimai.roster: '{customer}' will be truncated to 31 characters"
                ));
            }
        }
        let policy = &self.kimai.breaks;
        if policy.min_gap_secs > policy.max_gap_secs {
            problems.push("kimai.breaks: min_gap_secs exceeds max_gap_secs".to_string());
        }
        if policy.earliest_hour > policy.latest_hour || policy.latest_hour > 23 {
            problems.push("kimai.breaks: invalid hour window".to_string());
        }
        if !(0.0..=1.0).contains(&self.fusion.amount_tolerance) {
            problems.push("fusion.amount_tolerance: must be between 0 and 1".to_string());
        }
        if self.paging.max_pages == 0 || self.paging.max_records == 0 {
            problems.push("paging: limits must be greater than zero".to_string());
        }

        problems
    }
}

pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let yaml = "kimai:\n  timezone: Europe/Rome\npaging:\n  delay_ms: 0\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.kimai.timezone, "Europe/Rome");
        assert_eq!(cfg.kimai.excluded_customer, "General Admin");
        assert_eq!(cfg.paging.max_pages, 500);
        assert_eq!(cfg.paging.delay_ms, 0);
    }

    #[test]
    fn report_roster_skips_excluded_customer() {
        let roster = KimaiConfig::default().report_roster();
        assert_eq!(roster.len(), 10);
        assert!(!roster.iter().any(|c| c == "General Admin"));
        assert_eq!(roster[0], "Bluewater Operations");
    }

    #[test]
    fn check_flags_bad_timezone() {
        let mut cfg = Config::default();
        assert!(cfg.check().is_empty());
        cfg.kimai.timezone = "Mars/Olympus".to_string();
        assert_eq!(cfg.check().len(), 1);
    }
}
