use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config { print_config, check } = cmd {
        // ---- PRINT CONFIG ----
        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(cfg)?);
        }

        // ---- CHECK CONFIG ----
        if *check {
            let problems = cfg.check();
            if !problems.is_empty() {
                for p in &problems {
                    eprintln!("❌ {p}");
                }
                return Err(AppError::Config(format!(
                    "{} problem(s) found in configuration",
                    problems.len()
                )));
            }
            println!("✅ Configuration is valid");
        }

        if !*print_config && !*check {
            println!("📁 Config file: {}", Config::config_file().display());
        }
    }

    Ok(())
}
