//! One flat row per job for the BI summary sheet.

use crate::config::FusionConfig;
use crate::core::matcher::{MatchMethod, index_by_customer, match_invoice};
use crate::models::decode_records;
use crate::models::fusion::{FusionDataset, Invoice, Job};
use crate::utils::time::parse_wall_clock;
use chrono::{Duration, NaiveDateTime};
use std::collections::HashSet;

const NO_DESCRIPTION: &str = "No Description";
const UNKNOWN_CUSTOMER: &str = "Unknown";
const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub job_id: Option<String>,
    pub job_number: Option<String>,
    pub job_name: String,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub job_created: Option<NaiveDateTime>,
    pub estimated_completion: Option<NaiveDateTime>,
    pub invoice_date: Option<NaiveDateTime>,
    pub invoice_due: Option<NaiveDateTime>,
    pub job_value: f64,
    pub invoice_total: Option<f64>,
    pub category: String,
    pub job_status: Option<String>,
    pub payment_status: Option<String>,
    pub has_related_invoices: bool,
    pub invoice_count: usize,
    pub match_method: MatchMethod,
}

/// Due date is a fixed number of days after the invoice date.
pub fn due_date(invoice_date: Option<&str>, due_days: i64) -> Option<NaiveDateTime> {
    invoice_date
        .and_then(parse_wall_clock)
        .map(|dt| dt + Duration::days(due_days))
}

/// Jobs to summarise. Estimates stand in when there are no jobs at all, with
/// `end_date` defaulting to `start_date`.
fn source_jobs(dataset: &FusionDataset) -> Vec<Job> {
    let jobs: Vec<Job> = decode_records("jobs", dataset.records("jobs"));
    if !jobs.is_empty() {
        return jobs;
    }

    let estimates: Vec<Job> = decode_records("estimates", dataset.records("estimates"));
    if !estimates.is_empty() {
        tracing::info!(estimates = estimates.len(), "using estimates as job data");
    }
    estimates
        .into_iter()
        .map(|mut estimate| {
            if estimate.end_date.as_deref().is_none_or(str::is_empty) {
                estimate.end_date = estimate.start_date.clone();
            }
            estimate
        })
        .collect()
}

pub fn build_job_summary(dataset: &FusionDataset, cfg: &FusionConfig) -> Vec<JobSummary> {
    let jobs = source_jobs(dataset);
    let invoices: Vec<Invoice> = decode_records("invoices", dataset.records("invoices"));

    tracing::info!(
        jobs = jobs.len(),
        invoices = invoices.len(),
        "building job summary"
    );

    if jobs.is_empty() {
        tracing::warn!("no jobs or estimates data available");
        return Vec::new();
    }

    let by_customer = index_by_customer(&invoices);
    let mut seen: HashSet<Option<String>> = HashSet::new();
    let mut rows = Vec::with_capacity(jobs.len());

    for job in jobs {
        if !seen.insert(job.id.clone()) {
            continue;
        }

        let customer_name = job
            .customer_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
        let candidates = by_customer
            .get(&customer_name)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let matched = match_invoice(job.total, candidates, cfg.amount_tolerance);
        let invoice_date = matched.invoice.and_then(|i| i.date.as_deref());

        rows.push(JobSummary {
            job_number: job.number.clone(),
            job_name: job
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            customer_id: job.customer_id.clone(),
            job_created: job.created_at.as_deref().and_then(parse_wall_clock),
            estimated_completion: job.end_date.as_deref().and_then(parse_wall_clock),
            invoice_date: invoice_date.and_then(parse_wall_clock),
            invoice_due: due_date(invoice_date, cfg.due_days),
            job_value: job.total.unwrap_or(0.0),
            invoice_total: matched.invoice.and_then(|i| i.total),
            category: job
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            job_status: job.status.clone(),
            payment_status: job.payment_status.clone(),
            has_related_invoices: matched.invoice.is_some(),
            invoice_count: candidates.len(),
            match_method: matched.method,
            job_id: job.id,
            customer_name,
        });
    }

    tracing::info!(rows = rows.len(), "created job records");
    rows
}
