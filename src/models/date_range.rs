//! The `DATE_RANGE` selector shared by both pipelines.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DateRange {
    #[default]
    YearToDate,
    MonthToDate,
    AllData,
}

impl DateRange {
    /// "Year to Date" and "Month to Date" are recognised (case-insensitively,
    /// plus the YTD/MTD shorthands); anything else means all data.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "year to date" | "ytd" => DateRange::YearToDate,
            "month to date" | "mtd" => DateRange::MonthToDate,
            _ => DateRange::AllData,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateRange::YearToDate => "Year to Date",
            DateRange::MonthToDate => "Month to Date",
            DateRange::AllData => "All Data",
        }
    }

    /// YTD and MTD filter by recency while paginating; All Data keeps everything.
    pub fn is_windowed(&self) -> bool {
        !matches!(self, DateRange::AllData)
    }

    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        let fallback = NaiveDate::MIN;
        match self {
            DateRange::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            DateRange::MonthToDate => NaiveDate::from_ymd_opt(today.year(), today.month(), 1),
            DateRange::AllData => NaiveDate::from_ymd_opt(2000, 1, 1),
        }
        .unwrap_or(fallback)
    }

    /// Inclusive bounds: start of the first day through the last second of today.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.start_date(today).and_time(NaiveTime::MIN);
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        (start, today.and_time(end_of_day))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_selector_means_all_data() {
        assert_eq!(DateRange::parse("Year to Date"), DateRange::YearToDate);
        assert_eq!(DateRange::parse("month to date"), DateRange::MonthToDate);
        assert_eq!(DateRange::parse("last quarter"), DateRange::AllData);
    }

    #[test]
    fn start_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(
            DateRange::YearToDate.start_date(today),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
        assert_eq!(
            DateRange::MonthToDate.start_date(today),
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
        );
        assert_eq!(
            DateRange::AllData.start_date(today),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
    }

    #[test]
    fn bounds_cover_the_whole_of_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let (start, end) = DateRange::YearToDate.bounds(today);
        assert_eq!(start.format("%Y-%m-%dT%H:%M:%S").to_string(), "2026-01-01T00:00:00");
        assert_eq!(end.format("%Y-%m-%dT%H:%M:%S").to_string(), "2026-10-18T23:59:59");
    }
}
