//! Kimai workbooks: customer report and employee hours summary.

use crate::config::KimaiConfig;
use crate::core::breaks::{BreakInterval, DailyBreaks};
use crate::core::resolver::ResolvedEntry;
use crate::report::book::{Cell, ReportBook, Sheet, dated_file_name};
use crate::utils::time::{round_to, us_date};
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

pub const CUSTOMER_BOOK_PREFIX: &str = "Kimai_Customer_Reports_YTD";
pub const SUMMARY_BOOK_PREFIX: &str = "Kimai_Summary_YTD";

pub const EMPLOYEE_SUMMARY: &str = "Employee Summary";
pub const ACTIVITY_DETAILS: &str = "Activity Details";
pub const CUSTOMER_HOURS: &str = "Customer Hours Summary";
pub const BREAK_ANALYSIS: &str = "YTD Break Analysis";
pub const WEEKLY_SUMMARY: &str = "Weekly Summary";

const ROSTER_HEADERS: [&str; 6] = [
    "EmployeeName",
    "EmployeeHours",
    "ProjectName",
    "ActivityName",
    "ActivityHours",
    "CustomerTotal",
];

/// Grouped sums over the reportable entries. BTreeMaps keep the output
/// order stable between runs.
#[derive(Debug, Default)]
struct Totals {
    by_customer_employee: BTreeMap<(String, String), f64>,
    by_detail: BTreeMap<(String, String, String, String, Option<NaiveDate>), f64>,
    by_customer: BTreeMap<String, f64>,
    /// customer -> employee -> (project, activity) -> hours
    by_roster_line: BTreeMap<String, BTreeMap<String, BTreeMap<(String, String), f64>>>,
}

impl Totals {
    fn collect<'a>(entries: impl Iterator<Item = &'a ResolvedEntry>) -> Self {
        let mut totals = Totals::default();
        for e in entries {
            let customer = e.customer_label().to_string();
            let employee = e.user_label().to_string();
            let project = e.project_label().to_string();
            let activity = e.activity_label().to_string();

            *totals
                .by_customer_employee
                .entry((customer.clone(), employee.clone()))
                .or_default() += e.hours;
            *totals
                .by_detail
                .entry((
                    customer.clone(),
                    employee.clone(),
                    project.clone(),
                    activity.clone(),
                    e.date,
                ))
                .or_default() += e.hours;
            *totals.by_customer.entry(customer.clone()).or_default() += e.hours;
            *totals
                .by_roster_line
                .entry(customer)
                .or_default()
                .entry(employee)
                .or_default()
                .entry((project, activity))
                .or_default() += e.hours;
        }
        totals
    }
}

/// The per-customer workbook. Entries of the excluded customer are left out
/// of every sheet.
pub fn build_customer_book(
    entries: &[ResolvedEntry],
    breaks: &[DailyBreaks],
    cfg: &KimaiConfig,
    today: NaiveDate,
) -> ReportBook {
    let reportable: Vec<&ResolvedEntry> = entries
        .iter()
        .filter(|e| e.customer_label() != cfg.excluded_customer)
        .collect();
    tracing::info!(
        entries = reportable.len(),
        excluded = entries.len() - reportable.len(),
        "building customer workbook"
    );

    let totals = Totals::collect(reportable.into_iter());
    let run_date = us_date(today);

    let mut book = ReportBook::new(dated_file_name(CUSTOMER_BOOK_PREFIX, today));
    book.add(employee_summary(&totals, &run_date));
    book.add(activity_details(&totals, &run_date));
    book.add(customer_hours(&totals));
    book.add(break_analysis(breaks));
    for customer in cfg.report_roster() {
        book.add(roster_sheet(&customer, &totals));
    }
    book
}

fn employee_summary(totals: &Totals, run_date: &str) -> Sheet {
    let mut sheet = Sheet::new(EMPLOYEE_SUMMARY, &["Customer", "Employee", "TotalHours", "Date"]);
    for ((customer, employee), hours) in &totals.by_customer_employee {
        sheet.push(vec![
            customer.as_str().into(),
            employee.as_str().into(),
            round_to(*hours, 2).into(),
            run_date.into(),
        ]);
    }
    sheet
}

fn activity_details(totals: &Totals, run_date: &str) -> Sheet {
    let mut sheet = Sheet::new(
        ACTIVITY_DETAILS,
        &["Customer", "Employee", "Project", "Activity", "Hours", "Date"],
    );
    for ((customer, employee, project, activity, date), hours) in &totals.by_detail {
        let date = date.map(us_date).unwrap_or_else(|| run_date.to_string());
        sheet.push(vec![
            customer.as_str().into(),
            employee.as_str().into(),
            project.as_str().into(),
            activity.as_str().into(),
            round_to(*hours, 2).into(),
            date.into(),
        ]);
    }
    sheet
}

fn customer_hours(totals: &Totals) -> Sheet {
    let mut sheet = Sheet::new(CUSTOMER_HOURS, &["Customer", "TotalHours", "Percentage"]);
    let grand_total: f64 = totals.by_customer.values().sum();

    let mut ranked: Vec<(&String, f64)> = totals.by_customer.iter().map(|(c, h)| (c, *h)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (customer, hours) in ranked {
        let pct = if grand_total > 0.0 {
            round_to(hours / grand_total * 100.0, 1)
        } else {
            0.0
        };
        sheet.push(vec![customer.as_str().into(), round_to(hours, 2).into(), pct.into()]);
    }
    sheet
}

fn break_analysis(breaks: &[DailyBreaks]) -> Sheet {
    let mut sheet = Sheet::new(
        BREAK_ANALYSIS,
        &[
            "Employee",
            "Date",
            "BreakStart",
            "BreakEnd",
            "DurationMinutes",
            "DurationHours",
            "WorkDayStart",
            "WorkDayEnd",
        ],
    );

    let mut rows: Vec<(&DailyBreaks, &BreakInterval)> = breaks
        .iter()
        .flat_map(|day| day.breaks.iter().map(move |b| (day, b)))
        .collect();
    rows.sort_by(|(da, ba), (db, bb)| {
        (da.user.as_str(), da.date, ba.start).cmp(&(db.user.as_str(), db.date, bb.start))
    });

    let clock = |t: NaiveTime| t.format("%H:%M:%S").to_string();
    for (day, b) in rows {
        sheet.push(vec![
            day.user.as_str().into(),
            day.date_formatted().into(),
            clock(b.start).into(),
            clock(b.end).into(),
            b.minutes().into(),
            b.hours().into(),
            clock(day.first_work_start).into(),
            clock(day.last_work_end).into(),
        ]);
    }
    sheet
}

fn roster_sheet(customer: &str, totals: &Totals) -> Sheet {
    let mut sheet = Sheet::new(customer, &ROSTER_HEADERS);

    let Some(employees) = totals.by_roster_line.get(customer) else {
        sheet.push(vec![
            Cell::Blank,
            Cell::Number(0.0),
            Cell::Blank,
            Cell::Blank,
            Cell::Number(0.0),
            Cell::Number(0.0),
        ]);
        return sheet;
    };

    let customer_total = round_to(totals.by_customer.get(customer).copied().unwrap_or(0.0), 2);

    for (employee, lines) in employees {
        let employee_hours = round_to(lines.values().sum(), 2);
        for ((project, activity), hours) in lines {
            sheet.push(vec![
                employee.as_str().into(),
                employee_hours.into(),
                project.as_str().into(),
                activity.as_str().into(),
                round_to(*hours, 2).into(),
                customer_total.into(),
            ]);
        }
    }
    sheet
}

/// The headline workbook: hours per employee over every entry, then totals.
pub fn build_summary_book(entries: &[ResolvedEntry], today: NaiveDate) -> ReportBook {
    let mut per_employee: BTreeMap<String, f64> = BTreeMap::new();
    for e in entries {
        *per_employee.entry(e.user_label().to_string()).or_default() += e.hours;
    }

    let total: f64 = per_employee.values().sum();
    let employees = per_employee.len();
    let average = if employees > 0 { total / employees as f64 } else { 0.0 };

    let mut sheet = Sheet::with_headers(WEEKLY_SUMMARY, Vec::new());
    for (employee, hours) in &per_employee {
        sheet.push(vec![employee.as_str().into(), round_to(*hours, 2).into()]);
    }
    sheet.push(Vec::new());
    sheet.push(vec!["METRIC".into(), "VALUE".into()]);
    sheet.push(vec!["Total Hours".into(), round_to(total, 2).into()]);
    sheet.push(vec!["Total Employees".into(), employees.into()]);
    sheet.push(vec!["Average Hours".into(), round_to(average, 2).into()]);

    let mut book = ReportBook::new(dated_file_name(SUMMARY_BOOK_PREFIX, today));
    book.add(sheet);
    book
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(customer: &str, user: &str, hours: f64) -> ResolvedEntry {
        ResolvedEntry {
            customer: Some(customer.into()),
            project: Some("P".into()),
            activity: Some("A".into()),
            user: Some(user.into()),
            date: NaiveDate::from_ymd_opt(2026, 2, 3),
            hours,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn percentages_and_order() {
        let entries = vec![entry("TECO", "a", 1.0), entry("DUKE", "b", 3.0)];
        let book = build_customer_book(&entries, &[], &KimaiConfig::default(), today());
        let sheet = book.sheet(CUSTOMER_HOURS).unwrap();
        assert_eq!(sheet.rows[0][0], Cell::Text("DUKE".into()));
        assert_eq!(sheet.rows[0][2], Cell::Number(75.0));
        assert_eq!(sheet.rows[1][2], Cell::Number(25.0));
    }

    #[test]
    fn excluded_customer_is_left_out() {
        let entries = vec![entry("General Admin", "a", 2.0), entry("TECO", "a", 1.0)];
        let cfg = KimaiConfig::default();
        let book = build_customer_book(&entries, &[], &cfg, today());
        assert!(book.sheet("General Admin").is_none());
        let summary = book.sheet(EMPLOYEE_SUMMARY).unwrap();
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(book.sheets.len(), 4 + cfg.report_roster().len());
    }

    #[test]
    fn roster_sheet_totals() {
        let mut second = entry("TECO", "a", 0.5);
        second.activity = Some("B".into());
        let entries = vec![entry("TECO", "a", 1.25), second];
        let book = build_customer_book(&entries, &[], &KimaiConfig::default(), today());
        let teco = book.sheet("TECO").unwrap();
        assert_eq!(teco.rows.len(), 2);
        assert_eq!(teco.rows[0][1], Cell::Number(1.75));
        assert_eq!(teco.rows[0][5], Cell::Number(1.75));
    }

    #[test]
    fn summary_metrics() {
        let entries = vec![entry("TECO", "a", 2.0), entry("General Admin", "b", 4.0)];
        let book = build_summary_book(&entries, today());
        let sheet = book.sheet(WEEKLY_SUMMARY).unwrap();
        assert!(sheet.headers.is_empty());
        assert_eq!(sheet.rows.len(), 2 + 1 + 4);
        assert_eq!(sheet.rows[2], Vec::<Cell>::new());
        assert_eq!(sheet.rows[4][1], Cell::Number(6.0));
        assert_eq!(sheet.rows[5][1], Cell::Integer(2));
        assert_eq!(sheet.rows[6][1], Cell::Number(3.0));
        assert_eq!(book.file_name, "Kimai_Summary_YTD_20260301.xlsx");
    }
}
