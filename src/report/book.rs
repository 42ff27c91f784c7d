//! Format-neutral workbook model: typed cells, sheets and books.

use chrono::{NaiveDate, NaiveDateTime};

/// Longest sheet name a workbook accepts.
pub const SHEET_NAME_LIMIT: usize = 31;

/// A typed spreadsheet value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Blank,
}

impl Cell {
    /// Text cell, or blank when the string is empty.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() { Cell::Blank } else { Cell::Text(s) }
    }

    /// Rendered form, used for sizing columns and in tests.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Integer(n) => n.to_string(),
            Cell::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Blank => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Integer(n as i64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Blank)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(dt: NaiveDateTime) -> Self {
        Cell::DateTime(dt)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::Date(d)
    }
}

/// One worksheet: optional header row plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: sheet_title(name),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_headers(name: &str, headers: Vec<String>) -> Self {
        Self {
            name: sheet_title(name),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

/// A workbook ready to be written: file name plus sheets in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBook {
    pub file_name: String,
    pub sheets: Vec<Sheet>,
}

impl ReportBook {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            sheets: Vec::new(),
        }
    }

    pub fn add(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Make a name usable as a sheet title: forbidden characters replaced and
/// length capped.
pub fn sheet_title(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(SHEET_NAME_LIMIT)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

/// Base name plus run date, e.g. `Kimai_Summary_YTD_20260301.xlsx`.
pub fn dated_file_name(prefix: &str, today: NaiveDate) -> String {
    format!("{prefix}_{}.xlsx", today.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_titles_are_truncated() {
        let title = sheet_title("a_really_long_endpoint_name_for_a_sheet");
        assert_eq!(title.chars().count(), SHEET_NAME_LIMIT);
        assert_eq!(sheet_title("SCC/Miami"), "SCC_Miami");
    }

    #[test]
    fn empty_text_is_blank() {
        assert_eq!(Cell::from(""), Cell::Blank);
        assert_eq!(Cell::from(None::<String>), Cell::Blank);
        assert_eq!(Cell::from(Some(2.5)), Cell::Number(2.5));
    }

    #[test]
    fn file_name_carries_date() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(
            dated_file_name("ServiceFusion_YTD", d),
            "ServiceFusion_YTD_20260301.xlsx"
        );
    }
}
