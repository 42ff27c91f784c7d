pub mod config;
pub mod fusion;
pub mod kimai;

use crate::config::non_empty_env;
use crate::core::RunSummary;
use crate::models::date_range::DateRange;
use crate::utils::table::Table;

/// `--range` wins, then `DATE_RANGE`, then year to date.
pub(crate) fn resolve_range(flag: Option<&str>) -> DateRange {
    flag.map(str::to_string)
        .or_else(|| non_empty_env("DATE_RANGE"))
        .map(|s| DateRange::parse(&s))
        .unwrap_or_default()
}

/// End-of-run report on stdout: per-endpoint counts, then written files.
pub(crate) fn print_summary(summary: &RunSummary) {
    let mut table = Table::new(&["Endpoint", "Records", "Outcome"]);
    for e in &summary.endpoints {
        table.add_row(vec![e.name.clone(), e.records.to_string(), e.outcome.clone()]);
    }
    println!("{}", table.render());

    for path in &summary.files {
        println!("✅ Report written: {}", path.display());
    }
}
