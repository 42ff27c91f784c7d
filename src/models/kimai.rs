//! Kimai entity shapes (collection endpoints, non-expanded form).

use super::ids::{opt_id, opt_number, opt_text};
use serde::{Deserialize, Serialize};

/// One row of `/api/timesheets`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimesheetEntry {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_id")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "opt_id")]
    pub project: Option<String>,
    #[serde(default, deserialize_with = "opt_id")]
    pub activity: Option<String>,
    #[serde(default)]
    pub begin: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// Seconds. Running timers report 0 or null.
    #[serde(default, deserialize_with = "opt_number")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "opt_number")]
    pub rate: Option<f64>,
    #[serde(default)]
    pub billable: Option<bool>,
    #[serde(default)]
    pub exported: Option<bool>,
    #[serde(default, deserialize_with = "opt_text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `parentTitle` carries the customer name the project belongs to.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Project {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "parentTitle")]
    pub parent_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct User {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Everything one Kimai run pulls from the API.
#[derive(Debug, Clone, Default)]
pub struct KimaiDataset {
    pub timesheets: Vec<TimesheetEntry>,
    pub activities: Vec<Activity>,
    pub projects: Vec<Project>,
    pub users: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timesheet_ids_are_normalised_to_strings() {
        let raw = r#"{"id": 9, "user": 3, "project": "12", "activity": 4,
            "begin": "2026-02-03T10:00:00-0500", "end": null, "duration": 0,
            "metaFields": []}"#;
        let entry: TimesheetEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.user.as_deref(), Some("3"));
        assert_eq!(entry.project.as_deref(), Some("12"));
        assert!(entry.end.is_none());
    }

    #[test]
    fn project_reads_parent_title() {
        let raw = r#"{"id": 1, "name": "Pole audit", "parentTitle": "TECO"}"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(project.parent_title.as_deref(), Some("TECO"));
    }
}
