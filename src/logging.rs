//! Logging setup. Everything goes to stderr so stdout stays free for the
//! run summary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. `RUST_LOG`, when set, replaces the
/// verbosity flags.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("ytd_extract=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}
