//! End-to-end runs: fetch, resolve, aggregate, write.

use crate::config::{Config, FusionCredentials, KimaiConfig, KimaiCredentials};
use crate::core::breaks::detect_breaks;
use crate::core::jobs::build_job_summary;
use crate::core::resolver::{LookupTables, resolve_entries};
use crate::errors::{AppError, AppResult};
use crate::export::save_book;
use crate::extract::{EndpointExtract, FusionClient, KimaiClient};
use crate::models::date_range::DateRange;
use crate::models::fusion::FusionDataset;
use crate::models::kimai::KimaiDataset;
use crate::report::book::ReportBook;
use crate::report::fusion::build_fusion_book;
use crate::report::kimai::{build_customer_book, build_summary_book};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::PathBuf;

/// Inputs that vary per invocation. The clock is captured once so file
/// names, date windows and timestamps agree.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub range: DateRange,
    pub today: NaiveDate,
    pub now: NaiveDateTime,
    pub out_dir: String,
}

impl RunContext {
    pub fn new(range: DateRange, out_dir: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        Self {
            range,
            today: now.date(),
            now,
            out_dir: out_dir.into(),
        }
    }
}

/// Per-endpoint line for the end-of-run table.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointCount {
    pub name: String,
    pub records: usize,
    pub outcome: String,
}

impl From<&EndpointExtract> for EndpointCount {
    fn from(e: &EndpointExtract) -> Self {
        Self {
            name: e.name.clone(),
            records: e.records().len(),
            outcome: e.extraction.stop.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files: Vec<PathBuf>,
    pub endpoints: Vec<EndpointCount>,
}

impl RunSummary {
    pub fn total_records(&self) -> usize {
        self.endpoints.iter().map(|e| e.records).sum()
    }
}

/// Both Kimai workbooks from an already-fetched dataset.
pub fn kimai_books(dataset: &KimaiDataset, cfg: &KimaiConfig, today: NaiveDate) -> AppResult<Vec<ReportBook>> {
    let tz = cfg.tz()?;
    let tables = LookupTables::build(dataset);
    let entries = resolve_entries(&dataset.timesheets, &tables, tz);
    let breaks = detect_breaks(&dataset.timesheets, &tables, tz, &cfg.breaks);

    tracing::info!(
        entries = entries.len(),
        break_days = breaks.len(),
        "timesheets resolved"
    );

    Ok(vec![
        build_customer_book(&entries, &breaks, cfg, today),
        build_summary_book(&entries, today),
    ])
}

pub fn run_kimai(cfg: &Config, creds: &KimaiCredentials, ctx: &RunContext) -> AppResult<RunSummary> {
    // Fail on a bad zone before touching the network.
    cfg.kimai.tz()?;

    let client = KimaiClient::new(cfg, creds)?;
    let (begin, end) = ctx.range.bounds(ctx.today);
    tracing::info!(range = %ctx.range, %begin, %end, "starting Kimai extraction");

    let extract = client.fetch_all(begin, end);
    if extract.all_failed() {
        return Err(AppError::NoData("Kimai API: every endpoint failed".to_string()));
    }

    let mut summary = RunSummary {
        endpoints: extract.endpoints.iter().map(EndpointCount::from).collect(),
        ..Default::default()
    };

    for book in kimai_books(&extract.dataset, &cfg.kimai, ctx.today)? {
        summary.files.push(save_book(&book, &ctx.out_dir)?);
    }

    Ok(summary)
}

pub fn run_fusion(cfg: &Config, creds: &FusionCredentials, ctx: &RunContext) -> AppResult<RunSummary> {
    let mut client = FusionClient::new(cfg, creds)?;
    tracing::info!(range = %ctx.range, "starting Service Fusion extraction");

    let endpoints = client.extract_all(ctx.range, ctx.today);
    let dataset = FusionDataset::from(endpoints.as_slice());
    if dataset.total_records() == 0 {
        tracing::warn!("no Service Fusion records extracted, writing empty report");
    }

    let jobs = build_job_summary(&dataset, &cfg.fusion);
    let book = build_fusion_book(&dataset, &jobs, ctx.today, ctx.now);
    let path = save_book(&book, &ctx.out_dir)?;

    let summary = RunSummary {
        files: vec![path],
        endpoints: endpoints.iter().map(EndpointCount::from).collect(),
    };
    tracing::info!(
        records = summary.total_records(),
        "Service Fusion extraction completed"
    );
    Ok(summary)
}
