pub mod breaks;
pub mod jobs;
pub mod matcher;
pub mod pipeline;
pub mod resolver;

pub use pipeline::{RunContext, RunSummary, run_fusion, run_kimai};
