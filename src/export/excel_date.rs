// src/export/excel_date.rs

use chrono::{NaiveDate, NaiveDateTime};

pub(crate) const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
pub(crate) const DATE_FORMAT: &str = "yyyy-mm-dd";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Excel 1900 date system: day 0 is 1899-12-30.
fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Serial day number with the time of day as fraction.
pub(crate) fn naive_datetime_to_excel_serial(dt: &NaiveDateTime) -> f64 {
    let duration = *dt - excel_epoch();

    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86_400) as f64;

    days + secs / SECONDS_PER_DAY
}

pub(crate) fn naive_date_to_excel_serial(d: &NaiveDate) -> f64 {
    (*d - excel_epoch().date()).num_days() as f64
}
