use crate::cli::commands::{print_summary, resolve_range};
use crate::cli::parser::Commands;
use crate::config::{Config, FusionCredentials};
use crate::core::{RunContext, run_fusion};
use crate::errors::AppResult;

/// Handle the `fusion` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Fusion { range } = cmd {
        let creds = FusionCredentials::from_env()?;
        let ctx = RunContext::new(resolve_range(range.as_deref()), cfg.output_dir.clone());

        let summary = run_fusion(cfg, &creds, &ctx)?;
        print_summary(&summary);
        println!("📊 {} records extracted", summary.total_records());
    }

    Ok(())
}
