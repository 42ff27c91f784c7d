//! Service Fusion PowerBI workbook: job summary, extraction summary and
//! one raw sheet per endpoint.

use crate::core::jobs::JobSummary;
use crate::models::fusion::FusionDataset;
use crate::report::book::{Cell, ReportBook, Sheet, dated_file_name};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const FUSION_BOOK_PREFIX: &str = "ServiceFusion_YTD";
pub const POWERBI_SUMMARY: &str = "PowerBI_Summary";
pub const EXTRACTION_SUMMARY: &str = "Extraction_Summary";

pub const POWERBI_HEADERS: [&str; 17] = [
    "Job_ID",
    "Job_Number",
    "Job_Name",
    "Customer_ID",
    "Customer_Name",
    "Job_Created_Date",
    "ECD_Estimated_Completion_Date",
    "Invoice_Date",
    "Invoice_ECD_Due_Date",
    "Job_Project_Value",
    "Invoice_Total",
    "Business_Category",
    "Job_Status",
    "Payment_Status",
    "Has_Related_Invoices",
    "Invoice_Count",
    "Invoice_Match_Method",
];

pub fn build_fusion_book(
    dataset: &FusionDataset,
    jobs: &[JobSummary],
    today: NaiveDate,
    extracted_at: NaiveDateTime,
) -> ReportBook {
    let mut book = ReportBook::new(dated_file_name(FUSION_BOOK_PREFIX, today));
    book.add(powerbi_summary(jobs));
    book.add(extraction_summary(dataset, extracted_at));

    for (endpoint, records) in &dataset.endpoints {
        if records.is_empty() {
            continue;
        }
        book.add(raw_dump(endpoint, records));
    }
    book
}

fn powerbi_summary(jobs: &[JobSummary]) -> Sheet {
    let mut sheet = Sheet::new(POWERBI_SUMMARY, &POWERBI_HEADERS);
    for job in jobs {
        sheet.push(vec![
            job.job_id.clone().into(),
            job.job_number.clone().into(),
            job.job_name.clone().into(),
            job.customer_id.clone().into(),
            job.customer_name.clone().into(),
            job.job_created.into(),
            job.estimated_completion.into(),
            job.invoice_date.into(),
            job.invoice_due.into(),
            job.job_value.into(),
            job.invoice_total.into(),
            job.category.clone().into(),
            job.job_status.clone().into(),
            job.payment_status.clone().into(),
            job.has_related_invoices.into(),
            job.invoice_count.into(),
            job.match_method.label().into(),
        ]);
    }
    tracing::info!(rows = sheet.rows.len(), "PowerBI summary prepared");
    sheet
}

fn extraction_summary(dataset: &FusionDataset, extracted_at: NaiveDateTime) -> Sheet {
    let mut sheet = Sheet::new(EXTRACTION_SUMMARY, &["Endpoint", "Record Count", "Extracted At"]);
    let stamp = extracted_at.format("%Y-%m-%d %H:%M:%S").to_string();
    for (endpoint, records) in &dataset.endpoints {
        sheet.push(vec![
            endpoint.as_str().into(),
            records.len().into(),
            stamp.as_str().into(),
        ]);
    }
    sheet
}

/// Flatten raw records: columns are every top-level key in first-seen order.
fn raw_dump(endpoint: &str, records: &[Value]) -> Sheet {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let mut sheet = Sheet::with_headers(endpoint, columns.clone());
    for record in records {
        let row = columns
            .iter()
            .map(|key| record.get(key).map(json_cell).unwrap_or(Cell::Blank))
            .collect();
        sheet.push(row);
    }
    sheet
}

fn json_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Blank,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Cell::Integer(i),
            None => n.as_f64().map(Cell::Number).unwrap_or(Cell::Blank),
        },
        Value::String(s) => Cell::text(s.as_str()),
        nested => Cell::text(nested.to_string()),
    }
}
