//! ytd-extract main entrypoint.

use ytd_extract::run;

fn main() {
    if let Err(e) = run() {
        tracing::error!(error = %e, "run failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
