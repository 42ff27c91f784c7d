//! Resolves Kimai foreign keys (activity, project, customer, user) into
//! display names.
//!
//! Lookups never fail: an id that is missing from its reference collection
//! resolves to `None`, and the report layer files those rows under
//! [`UNKNOWN`].

use crate::models::kimai::{KimaiDataset, TimesheetEntry};
use crate::utils::time::{parse_local, round_to};
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::HashMap;

/// Bucket label for names that could not be resolved.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    activity_names: HashMap<String, String>,
    project_names: HashMap<String, String>,
    project_customers: HashMap<String, String>,
    user_aliases: HashMap<String, String>,
}

impl LookupTables {
    pub fn build(dataset: &KimaiDataset) -> Self {
        let mut tables = LookupTables::default();

        for activity in &dataset.activities {
            if let (Some(id), Some(name)) = (&activity.id, &activity.name) {
                tables.activity_names.insert(id.clone(), name.clone());
            }
        }

        for project in &dataset.projects {
            let Some(id) = &project.id else { continue };
            if let Some(name) = &project.name {
                tables.project_names.insert(id.clone(), name.clone());
            }
            if let Some(customer) = &project.parent_title {
                tables.project_customers.insert(id.clone(), customer.clone());
            }
        }

        for user in &dataset.users {
            if let (Some(id), Some(alias)) = (&user.id, &user.alias) {
                tables.user_aliases.insert(id.clone(), alias.clone());
            }
        }

        tables
    }

    pub fn activity(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.activity_names.get(id)).cloned()
    }

    pub fn project(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.project_names.get(id)).cloned()
    }

    pub fn customer(&self, project_id: Option<&str>) -> Option<String> {
        project_id.and_then(|id| self.project_customers.get(id)).cloned()
    }

    pub fn user(&self, id: Option<&str>) -> Option<String> {
        id.and_then(|id| self.user_aliases.get(id)).cloned()
    }

    /// Name used in the break sheet, where every row needs a person.
    pub fn user_display(&self, id: &str) -> String {
        self.user(Some(id)).unwrap_or_else(|| format!("User_{id}"))
    }
}

/// A timesheet row after the join, reduced to what the reports need.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub customer: Option<String>,
    pub project: Option<String>,
    pub activity: Option<String>,
    pub user: Option<String>,
    /// Local calendar date of `begin`.
    pub date: Option<NaiveDate>,
    /// Duration in hours, rounded to 2 decimals.
    pub hours: f64,
}

impl ResolvedEntry {
    pub fn customer_label(&self) -> &str {
        self.customer.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn project_label(&self) -> &str {
        self.project.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn activity_label(&self) -> &str {
        self.activity.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn user_label(&self) -> &str {
        self.user.as_deref().unwrap_or(UNKNOWN)
    }
}

pub fn resolve_entry(entry: &TimesheetEntry, tables: &LookupTables, tz: Tz) -> ResolvedEntry {
    let date = entry
        .begin
        .as_deref()
        .and_then(|b| parse_local(b, tz))
        .map(|dt| dt.date_naive());
    if date.is_none() {
        tracing::debug!(entry = ?entry.id, begin = ?entry.begin, "unparseable begin timestamp");
    }

    ResolvedEntry {
        customer: tables.customer(entry.project.as_deref()),
        project: tables.project(entry.project.as_deref()),
        activity: tables.activity(entry.activity.as_deref()),
        user: tables.user(entry.user.as_deref()),
        date,
        hours: round_to(entry.duration.unwrap_or(0.0) / 3600.0, 2),
    }
}

pub fn resolve_entries(entries: &[TimesheetEntry], tables: &LookupTables, tz: Tz) -> Vec<ResolvedEntry> {
    entries
        .iter()
        .map(|entry| resolve_entry(entry, tables, tz))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::kimai::{Activity, Project, User};

    fn dataset() -> KimaiDataset {
        KimaiDataset {
            timesheets: Vec::new(),
            activities: vec![Activity {
                id: Some("4".into()),
                name: Some("Inspection".into()),
            }],
            projects: vec![Project {
                id: Some("12".into()),
                name: Some("Pole audit".into()),
                parent_title: Some("TECO".into()),
            }],
            users: vec![User {
                id: Some("3".into()),
                alias: Some("Dana Reyes".into()),
                username: Some("dreyes".into()),
            }],
        }
    }

    #[test]
    fn resolves_known_ids() {
        let tables = LookupTables::build(&dataset());
        let entry = TimesheetEntry {
            user: Some("3".into()),
            project: Some("12".into()),
            activity: Some("4".into()),
            begin: Some("2026-02-03T10:00:00-0500".into()),
            duration: Some(5400.0),
            ..Default::default()
        };
        let resolved = resolve_entry(&entry, &tables, chrono_tz::America::New_York);
        assert_eq!(resolved.customer_label(), "TECO");
        assert_eq!(resolved.project_label(), "Pole audit");
        assert_eq!(resolved.user_label(), "Dana Reyes");
        assert_eq!(resolved.date, NaiveDate::from_ymd_opt(2026, 2, 3));
        assert_eq!(resolved.hours, 1.5);
    }

    #[test]
    fn unknown_ids_resolve_to_none() {
        let tables = LookupTables::build(&dataset());
        let entry = TimesheetEntry {
            user: Some("99".into()),
            project: Some("77".into()),
            activity: None,
            ..Default::default()
        };
        let resolved = resolve_entry(&entry, &tables, chrono_tz::UTC);
        assert_eq!(resolved.customer, None);
        assert_eq!(resolved.activity, None);
        assert_eq!(resolved.user_label(), UNKNOWN);
        assert_eq!(resolved.date, None);
        assert_eq!(tables.user_display("99"), "User_99");
    }
}
