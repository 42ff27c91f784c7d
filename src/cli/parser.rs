use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for ytd-extract
/// Batch extraction of Kimai and Service Fusion data into BI-ready workbooks
#[derive(Parser, Debug)]
#[command(
    name = "ytd-extract",
    version = env!("CARGO_PKG_VERSION"),
    about = "Extract year-to-date time-tracking and field-service data into Excel reports",
    long_about = None
)]
pub struct Cli {
    /// Use this configuration file instead of the default location
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    /// Directory the workbooks are written to (overrides `output_dir`)
    #[arg(global = true, long = "out-dir")]
    pub out_dir: Option<String>,

    /// Log debug details to stderr
    #[arg(global = true, short = 'v', long = "verbose", conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(global = true, short = 'q', long = "quiet")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pull Kimai timesheets and write the customer and summary workbooks
    Kimai {
        /// "Year to Date", "Month to Date" or anything else for all data
        /// (defaults to $DATE_RANGE, then year to date)
        #[arg(long = "range")]
        range: Option<String>,
    },

    /// Pull Service Fusion jobs and invoices and write the PowerBI workbook
    Fusion {
        /// "Year to Date", "Month to Date" or anything else for all data
        /// (defaults to $DATE_RANGE, then year to date)
        #[arg(long = "range")]
        range: Option<String>,
    },

    /// Show or validate the effective configuration
    Config {
        #[arg(long = "print", help = "Print the effective configuration as YAML")]
        print_config: bool,

        #[arg(long = "check", help = "Validate timezone, roster and paging settings")]
        check: bool,
    },
}
