//! Infers work breaks from gaps between consecutive timesheet entries.
//!
//! Entries are grouped per (user, local calendar day) and sorted by start.
//! A gap between the end of one entry and the start of the next counts as a
//! break when its length and both boundary hours satisfy [`BreakPolicy`].

use crate::core::resolver::LookupTables;
use crate::models::kimai::TimesheetEntry;
use crate::utils::time::{parse_local, round_to, us_date};
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakPolicy {
    pub min_gap_secs: i64,
    pub max_gap_secs: i64,
    /// Inclusive local hour bounds for both ends of the gap.
    pub earliest_hour: u32,
    pub latest_hour: u32,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self {
            min_gap_secs: 300,
            max_gap_secs: 3600,
            earliest_hour: 10,
            latest_hour: 16,
        }
    }
}

impl BreakPolicy {
    pub fn accepts(&self, gap_start: &DateTime<Tz>, gap_end: &DateTime<Tz>) -> bool {
        let secs = (*gap_end - *gap_start).num_seconds();
        let in_window = |h: u32| (self.earliest_hour..=self.latest_hour).contains(&h);

        (self.min_gap_secs..=self.max_gap_secs).contains(&secs)
            && in_window(gap_start.hour())
            && in_window(gap_end.hour())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub seconds: i64,
}

impl BreakInterval {
    pub fn minutes(&self) -> f64 {
        round_to(self.seconds as f64 / 60.0, 1)
    }

    pub fn hours(&self) -> f64 {
        round_to(self.seconds as f64 / 3600.0, 2)
    }
}

/// Breaks found for one user on one local day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBreaks {
    pub user: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub breaks: Vec<BreakInterval>,
    pub first_work_start: NaiveTime,
    pub last_work_end: NaiveTime,
    pub total_work_entries: usize,
}

impl DailyBreaks {
    pub fn total_breaks(&self) -> usize {
        self.breaks.len()
    }

    pub fn total_break_secs(&self) -> i64 {
        self.breaks.iter().map(|b| b.seconds).sum()
    }

    pub fn total_break_hours(&self) -> f64 {
        round_to(self.total_break_secs() as f64 / 3600.0, 2)
    }

    pub fn date_formatted(&self) -> String {
        us_date(self.date)
    }
}

#[derive(Debug, Clone)]
struct Span {
    begin: DateTime<Tz>,
    end: DateTime<Tz>,
}

/// Group, sort and scan. Rows without a user or a parseable begin/end are
/// dropped. Output is ordered by user id, then date.
pub fn detect_breaks(
    entries: &[TimesheetEntry],
    tables: &LookupTables,
    tz: Tz,
    policy: &BreakPolicy,
) -> Vec<DailyBreaks> {
    let mut groups: BTreeMap<(String, NaiveDate), Vec<Span>> = BTreeMap::new();

    for entry in entries {
        let begin = entry.begin.as_deref().and_then(|s| parse_local(s, tz));
        let end = entry.end.as_deref().and_then(|s| parse_local(s, tz));
        let (Some(user), Some(begin), Some(end)) = (entry.user.clone(), begin, end) else {
            tracing::debug!(entry = ?entry.id, "dropping entry without user or timestamps");
            continue;
        };
        groups
            .entry((user, begin.date_naive()))
            .or_default()
            .push(Span { begin, end });
    }

    let mut records = Vec::new();

    for ((user_id, date), mut spans) in groups {
        if spans.len() < 2 {
            continue;
        }
        spans.sort_by_key(|s| s.begin);

        let breaks: Vec<BreakInterval> = spans
            .windows(2)
            .filter(|pair| policy.accepts(&pair[0].end, &pair[1].begin))
            .map(|pair| BreakInterval {
                start: pair[0].end.time(),
                end: pair[1].begin.time(),
                seconds: (pair[1].begin - pair[0].end).num_seconds(),
            })
            .collect();

        if breaks.is_empty() {
            continue;
        }

        let (Some(first), Some(last)) = (spans.first(), spans.last()) else {
            continue;
        };

        records.push(DailyBreaks {
            user: tables.user_display(&user_id),
            first_work_start: first.begin.time(),
            last_work_end: last.end.time(),
            total_work_entries: spans.len(),
            user_id,
            date,
            breaks,
        });
    }

    tracing::info!(days = records.len(), "user-day combinations with breaks");
    records
}
