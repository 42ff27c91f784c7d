//! ytd-extract library root.
//! Exposes the CLI parser, the high-level run() function, and the
//! extraction and reporting modules behind both pipelines.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod extract;
pub mod logging;
pub mod models;
pub mod report;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Kimai { .. } => cli::commands::kimai::handle(&cli.command, cfg),
        Commands::Fusion { .. } => cli::commands::fusion::handle(&cli.command, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    // file (or defaults), then environment
    let mut cfg = Config::load(cli.config.as_deref())?;

    // then command-line overrides
    if let Some(out_dir) = &cli.out_dir {
        cfg.output_dir = out_dir.clone();
    }

    dispatch(&cli, &cfg)
}
