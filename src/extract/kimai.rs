//! Kimai REST client.
//!
//! Kimai authenticates every request with static `X-AUTH-*` headers, returns
//! plain JSON arrays, and pages timesheets with a `page` query parameter.

use super::pager::{Extraction, PageLimits, PageResponse, Paginator, StopReason};
use super::EndpointExtract;
use crate::config::{Config, KimaiCredentials};
use crate::errors::{AppError, AppResult};
use crate::models::decode_records;
use crate::models::kimai::KimaiDataset;
use chrono::NaiveDateTime;
use reqwest::blocking::Client;
use serde_json::Value;

pub const TIMESHEETS: &str = "Timesheets";
pub const ACTIVITIES: &str = "Activities";
pub const PROJECTS: &str = "Projects";
pub const USERS: &str = "Users";

/// All four endpoints of one run, raw and decoded.
#[derive(Debug, Clone, Default)]
pub struct KimaiExtract {
    pub dataset: KimaiDataset,
    pub endpoints: Vec<EndpointExtract>,
}

impl KimaiExtract {
    /// Every endpoint errored out; there is nothing to report on.
    pub fn all_failed(&self) -> bool {
        !self.endpoints.is_empty() && self.endpoints.iter().all(EndpointExtract::failed)
    }
}

pub struct KimaiClient {
    client: Client,
    base_url: String,
    token: String,
    auth_user: String,
    permission: String,
    limits: PageLimits,
}

impl KimaiClient {
    pub fn new(cfg: &Config, creds: &KimaiCredentials) -> AppResult<Self> {
        let base_url = cfg
            .kimai
            .base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                AppError::MissingCredentials("KIMAI_BASE_URL environment variable".to_string())
            })?;

        let client = Client::builder()
            .user_agent(concat!("ytd-extract/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.paging.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: creds.token.clone(),
            auth_user: cfg.kimai.auth_user.clone(),
            permission: cfg.kimai.permission.clone(),
            limits: PageLimits::from(&cfg.paging),
        })
    }

    /// Fetch timesheets for `[begin, end]` plus the three lookup collections.
    pub fn fetch_all(&self, begin: NaiveDateTime, end: NaiveDateTime) -> KimaiExtract {
        let endpoints = vec![
            EndpointExtract::new(TIMESHEETS, self.fetch_timesheets(begin, end)),
            EndpointExtract::new(
                ACTIVITIES,
                self.fetch_collection(ACTIVITIES, "/api/activities", &[("user", "all")]),
            ),
            EndpointExtract::new(
                PROJECTS,
                self.fetch_collection(PROJECTS, "/api/projects", &[("user", "all")]),
            ),
            EndpointExtract::new(
                USERS,
                self.fetch_collection(USERS, "/api/users", &[("user", "all"), ("visible", "3")]),
            ),
        ];

        for endpoint in &endpoints {
            endpoint.log_outcome();
        }

        let dataset = KimaiDataset {
            timesheets: decode_records(TIMESHEETS, records_of(&endpoints, TIMESHEETS)),
            activities: decode_records(ACTIVITIES, records_of(&endpoints, ACTIVITIES)),
            projects: decode_records(PROJECTS, records_of(&endpoints, PROJECTS)),
            users: decode_records(USERS, records_of(&endpoints, USERS)),
        };

        KimaiExtract { dataset, endpoints }
    }

    pub fn fetch_timesheets(&self, begin: NaiveDateTime, end: NaiveDateTime) -> Extraction {
        let begin = begin.format("%Y-%m-%dT%H:%M:%S").to_string();
        let end = end.format("%Y-%m-%dT%H:%M:%S").to_string();

        Paginator::new(self.limits, |page| {
            tracing::info!(endpoint = TIMESHEETS, page, "fetching");
            let page = page.to_string();
            self.get(
                "/api/timesheets",
                &[
                    ("user", "all"),
                    ("begin", begin.as_str()),
                    ("end", end.as_str()),
                    ("page", page.as_str()),
                ],
            )
        })
        .collect_all()
    }

    /// Single request for an unpaginated lookup collection.
    pub fn fetch_collection(&self, name: &str, path: &str, params: &[(&str, &str)]) -> Extraction {
        tracing::info!(endpoint = name, "fetching");
        let (records, stop) = match self.get(path, params) {
            Ok(PageResponse::Records { items, .. }) => (items, StopReason::LastPage),
            Ok(PageResponse::Status(code)) => {
                tracing::error!(endpoint = name, status = code, "error fetching collection");
                (Vec::new(), StopReason::HttpStatus(code))
            }
            Err(e) => {
                tracing::error!(endpoint = name, error = %e, "exception fetching collection");
                (Vec::new(), StopReason::Failed(e.to_string()))
            }
        };
        Extraction {
            records,
            pages: 1,
            stop,
        }
    }

    fn get(&self, path: &str, params: &[(&str, &str)]) -> AppResult<PageResponse> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("X-AUTH-USER", &self.auth_user)
            .header("X-AUTH-TOKEN", &self.token)
            .header("X-AUTH-PERMISSION", &self.permission)
            .header("Accept", "application/json")
            .query(params)
            .send()?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Ok(PageResponse::Status(status.as_u16()));
        }

        // Anything but a JSON array counts as "no data".
        let items = match response.json::<Value>()? {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        Ok(PageResponse::list(items))
    }
}

fn records_of<'a>(endpoints: &'a [EndpointExtract], name: &str) -> &'a [Value] {
    endpoints
        .iter()
        .find(|e| e.name == name)
        .map(EndpointExtract::records)
        .unwrap_or(&[])
}
