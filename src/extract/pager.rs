//! Page-by-page extraction policy.
//!
//! `Paginator` is a lazy iterator over pages. It owns no HTTP: the caller
//! hands it a closure that fetches page N, and the paginator decides when to
//! stop (empty page, non-200, last page, old data, safety caps). Failures
//! never propagate; whatever was collected so far is kept and the reason is
//! recorded in `StopReason`.

use crate::config::PagingConfig;
use crate::errors::AppResult;
use serde_json::Value;
use std::fmt;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub max_records: usize,
    pub max_pages: u32,
    pub delay: Duration,
}

impl From<&PagingConfig> for PageLimits {
    fn from(cfg: &PagingConfig) -> Self {
        Self {
            max_records: cfg.max_records,
            max_pages: cfg.max_pages,
            delay: cfg.delay(),
        }
    }
}

/// `_meta` block of the `{items, _meta}` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: u32,
    pub page_count: u32,
}

/// What a single page request produced.
#[derive(Debug, Clone)]
pub enum PageResponse {
    Records {
        items: Vec<Value>,
        meta: Option<PageMeta>,
    },
    /// Any non-200 status.
    Status(u16),
}

impl PageResponse {
    pub fn list(items: Vec<Value>) -> Self {
        PageResponse::Records { items, meta: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back empty.
    Exhausted,
    /// `_meta.currentPage >= _meta.pageCount`.
    LastPage,
    /// More than half of a page fell outside the date window.
    OldData { page: u32, old: usize },
    RecordCap,
    PageCap,
    HttpStatus(u16),
    Failed(String),
}

impl StopReason {
    /// True when extraction ended because of a remote or transport problem.
    pub fn is_error(&self) -> bool {
        matches!(self, StopReason::HttpStatus(_) | StopReason::Failed(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "no more records"),
            StopReason::LastPage => write!(f, "last page reached"),
            StopReason::OldData { page, old } => {
                write!(f, "old data on page {page} ({old} records)")
            }
            StopReason::RecordCap => write!(f, "record safety limit reached"),
            StopReason::PageCap => write!(f, "page safety limit reached"),
            StopReason::HttpStatus(code) => write!(f, "HTTP status {code}"),
            StopReason::Failed(e) => write!(f, "request failed: {e}"),
        }
    }
}

/// Keeps records whose `created_at` (or `date`) mentions the target year.
/// Records without a date are kept.
#[derive(Debug, Clone)]
pub struct RecencyWindow {
    year: String,
}

impl RecencyWindow {
    pub fn for_year(year: i32) -> Self {
        Self {
            year: year.to_string(),
        }
    }

    pub fn is_current(&self, record: &Value) -> bool {
        match record_date(record) {
            Some(date) => date.contains(&self.year),
            None => true,
        }
    }
}

fn record_date(record: &Value) -> Option<String> {
    ["created_at", "date"].iter().find_map(|key| match record.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Everything an endpoint produced.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub records: Vec<Value>,
    pub pages: u32,
    pub stop: StopReason,
}

impl Extraction {
    /// The endpoint errored before yielding a single record.
    pub fn failed(&self) -> bool {
        self.records.is_empty() && self.stop.is_error()
    }
}

pub struct Paginator<F> {
    fetch: F,
    limits: PageLimits,
    window: Option<RecencyWindow>,
    page: u32,
    collected: usize,
    stop: Option<StopReason>,
}

impl<F> Paginator<F>
where
    F: FnMut(u32) -> AppResult<PageResponse>,
{
    pub fn new(limits: PageLimits, fetch: F) -> Self {
        Self {
            fetch,
            limits,
            window: None,
            page: 0,
            collected: 0,
            stop: None,
        }
    }

    pub fn with_window(mut self, window: Option<RecencyWindow>) -> Self {
        self.window = window;
        self
    }

    /// Drain every page into one record list.
    pub fn collect_all(mut self) -> Extraction {
        let mut records = Vec::new();
        for page in self.by_ref() {
            records.extend(page);
        }
        Extraction {
            records,
            pages: self.page,
            stop: self.stop.unwrap_or(StopReason::Exhausted),
        }
    }

    fn halt(&mut self, reason: StopReason) {
        tracing::debug!(page = self.page, reason = %reason, "pagination stopped");
        self.stop = Some(reason);
    }
}

impl<F> Iterator for Paginator<F>
where
    F: FnMut(u32) -> AppResult<PageResponse>,
{
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stop.is_some() {
            return None;
        }

        if self.page > 0 && !self.limits.delay.is_zero() {
            thread::sleep(self.limits.delay);
        }
        self.page += 1;
        let page = self.page;

        let (items, meta) = match (self.fetch)(page) {
            Ok(PageResponse::Records { items, meta }) => (items, meta),
            Ok(PageResponse::Status(code)) => {
                tracing::error!(page, status = code, "HTTP error while paginating");
                self.halt(StopReason::HttpStatus(code));
                return None;
            }
            Err(e) => {
                tracing::error!(page, error = %e, "request failed while paginating");
                self.halt(StopReason::Failed(e.to_string()));
                return None;
            }
        };

        if items.is_empty() {
            tracing::info!(page, "no more records");
            self.halt(StopReason::Exhausted);
            return None;
        }

        tracing::info!(page, records = items.len(), "page fetched");

        let total = items.len();
        let kept: Vec<Value> = match &self.window {
            Some(window) => {
                let kept: Vec<Value> = items.into_iter().filter(|r| window.is_current(r)).collect();
                let old = total - kept.len();
                if old * 2 > total && page > 1 {
                    self.collected += kept.len();
                    self.halt(StopReason::OldData { page, old });
                    return Some(kept);
                }
                kept
            }
            None => items,
        };
        self.collected += kept.len();

        let last_page = meta.is_some_and(|m| m.current_page >= m.page_count);

        if last_page {
            self.halt(StopReason::LastPage);
        } else if self.collected >= self.limits.max_records {
            self.halt(StopReason::RecordCap);
        } else if page >= self.limits.max_pages {
            self.halt(StopReason::PageCap);
        }

        Some(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn limits() -> PageLimits {
        PageLimits {
            max_records: 50_000,
            max_pages: 500,
            delay: Duration::ZERO,
        }
    }

    fn page_of(n: usize, date: &str) -> Vec<Value> {
        (0..n).map(|i| json!({"id": i, "created_at": date})).collect()
    }

    #[test]
    fn stops_on_first_empty_page() {
        let mut calls = Vec::new();
        let out = Paginator::new(limits(), |page| {
            calls.push(page);
            Ok(PageResponse::list(if page <= 2 {
                page_of(3, "2026-01-02")
            } else {
                Vec::new()
            }))
        })
        .collect_all();

        assert_eq!(out.records.len(), 6);
        assert_eq!(out.stop, StopReason::Exhausted);
        assert_eq!(calls, vec![1, 2, 3]);
    }

    #[test]
    fn keeps_partial_data_on_http_error() {
        let out = Paginator::new(limits(), |page| {
            Ok(if page == 1 {
                PageResponse::list(page_of(2, "2026-01-02"))
            } else {
                PageResponse::Status(500)
            })
        })
        .collect_all();

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.stop, StopReason::HttpStatus(500));
        assert!(!out.failed());
    }

    #[test]
    fn old_data_on_first_page_does_not_stop() {
        let out = Paginator::new(limits(), |page| {
            Ok(match page {
                1 => PageResponse::list(page_of(4, "2025-06-01")),
                2 => PageResponse::list(page_of(4, "2026-03-01")),
                _ => PageResponse::list(Vec::new()),
            })
        })
        .with_window(Some(RecencyWindow::for_year(2026)))
        .collect_all();

        assert_eq!(out.records.len(), 4);
        assert_eq!(out.stop, StopReason::Exhausted);
    }

    #[test]
    fn last_page_from_meta() {
        let out = Paginator::new(limits(), |page| {
            Ok(PageResponse::Records {
                items: page_of(1, "2026-01-02"),
                meta: Some(PageMeta {
                    current_page: page,
                    page_count: 2,
                }),
            })
        })
        .collect_all();

        assert_eq!(out.pages, 2);
        assert_eq!(out.stop, StopReason::LastPage);
    }

    #[test]
    fn undated_records_count_as_current() {
        let window = RecencyWindow::for_year(2026);
        assert!(window.is_current(&json!({"id": 1})));
        assert!(window.is_current(&json!({"date": "2026-02-01"})));
        assert!(!window.is_current(&json!({"created_at": "2025-12-31T10:00:00Z"})));
    }

    #[test]
    fn page_cap_stops_endless_source() {
        let out = Paginator::new(limits(), |_| Ok(PageResponse::list(page_of(10, "2026-01-02")))).collect_all();

        assert_eq!(out.pages, 500);
        assert_eq!(out.records.len(), 5_000);
        assert_eq!(out.stop, StopReason::PageCap);
    }

    #[test]
    fn record_cap_wins_before_page_cap() {
        let out = Paginator::new(limits(), |_| Ok(PageResponse::list(page_of(1_000, "2026-01-02")))).collect_all();

        assert_eq!(out.pages, 50);
        assert_eq!(out.records.len(), 50_000);
        assert_eq!(out.stop, StopReason::RecordCap);
    }
}
