use crate::cli::commands::{print_summary, resolve_range};
use crate::cli::parser::Commands;
use crate::config::{Config, KimaiCredentials};
use crate::core::{RunContext, run_kimai};
use crate::errors::AppResult;

/// Handle the `kimai` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Kimai { range } = cmd {
        let creds = KimaiCredentials::from_env()?;
        let ctx = RunContext::new(resolve_range(range.as_deref()), cfg.output_dir.clone());

        let summary = run_kimai(cfg, &creds, &ctx)?;
        print_summary(&summary);
    }

    Ok(())
}
