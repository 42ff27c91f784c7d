//! Service Fusion REST client.
//!
//! OAuth client-credentials token, cached until it expires, and
//! `{items, _meta}` envelopes paged newest-first.

use super::pager::{Extraction, PageLimits, PageMeta, PageResponse, Paginator, RecencyWindow, StopReason};
use super::EndpointExtract;
use crate::config::{Config, FusionCredentials};
use crate::errors::{AppError, AppResult};
use crate::models::date_range::DateRange;
use crate::models::fusion::{FUSION_ENDPOINTS, FusionDataset};
use crate::models::ids::opt_number;
use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};

const DEFAULT_EXPIRES_IN: u64 = 3600;
/// Token lifetimes above this are clamped.
const MAX_EXPIRES_IN: u64 = 30 * 86_400;
const MISSING_PAGE_COUNT: u32 = 999;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default, deserialize_with = "opt_number")]
    expires_in: Option<f64>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn new(value: String, expires_in: u64) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(expires_in))
            .or_else(|| now.checked_add(Duration::from_secs(DEFAULT_EXPIRES_IN)))
            .unwrap_or(now);
        Self { value, expires_at }
    }

    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Seconds until a token expires, from the server's `expires_in`.
fn token_lifetime(expires_in: Option<f64>) -> u64 {
    expires_in
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(|s| (s as u64).min(MAX_EXPIRES_IN))
        .unwrap_or(DEFAULT_EXPIRES_IN)
}

pub struct FusionClient {
    client: Client,
    base_url: String,
    creds: FusionCredentials,
    token: Option<AccessToken>,
    limits: PageLimits,
}

impl FusionClient {
    pub fn new(cfg: &Config, creds: &FusionCredentials) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("ytd-extract/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.paging.timeout() * 2)
            .build()?;

        Ok(Self {
            client,
            base_url: cfg.fusion.base_url.trim_end_matches('/').to_string(),
            creds: creds.clone(),
            token: None,
            limits: PageLimits::from(&cfg.paging),
        })
    }

    /// Return a valid bearer token, requesting a new one only when the cached
    /// token is missing or expired.
    pub fn authenticate(&mut self) -> AppResult<String> {
        if let Some(token) = self.token.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.value.clone());
        }

        tracing::info!("authenticating with Service Fusion API");

        let response = self
            .client
            .post(format!("{}/oauth/access_token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.creds.client_id.as_str()),
                ("client_secret", self.creds.client_secret.as_str()),
            ])
            .send()?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(AppError::Auth(format!("{} - {}", status.as_u16(), body.trim())));
        }

        let payload: TokenResponse = response.json()?;
        let expires_in = token_lifetime(payload.expires_in);
        self.token = Some(AccessToken::new(payload.access_token.clone(), expires_in));

        tracing::info!(expires_in, "authentication successful");
        Ok(payload.access_token)
    }

    /// Extract all four collections. Each endpoint fails independently.
    pub fn extract_all(&mut self, range: DateRange, today: NaiveDate) -> Vec<EndpointExtract> {
        tracing::info!(range = %range, "starting extraction for all endpoints");

        FUSION_ENDPOINTS
            .iter()
            .map(|name| {
                let started = Instant::now();
                let extraction = self.extract_endpoint(name, range, today);
                let endpoint = EndpointExtract::new(name, extraction);
                tracing::info!(
                    endpoint = name,
                    records = endpoint.records().len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "endpoint done"
                );
                endpoint.log_outcome();
                endpoint
            })
            .collect()
    }

    /// Paginate one collection, newest first, stopping early on old data
    /// for windowed ranges.
    pub fn extract_endpoint(&mut self, name: &str, range: DateRange, today: NaiveDate) -> Extraction {
        let token = match self.authenticate() {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(endpoint = name, error = %e, "authentication error");
                return Extraction {
                    records: Vec::new(),
                    pages: 0,
                    stop: StopReason::Failed(e.to_string()),
                };
            }
        };

        tracing::info!(endpoint = name, range = %range, "starting extraction");

        let url = format!("{}/v1/{}", self.base_url, name);
        let window = range
            .is_windowed()
            .then(|| RecencyWindow::for_year(today.year()));

        Paginator::new(self.limits, |page| {
            tracing::info!(endpoint = name, page, "requesting");
            let response = self.get_page(&url, &token, page, true)?;
            match response {
                PageResponse::Status(code) if page == 1 => {
                    tracing::warn!(endpoint = name, status = code, "sorted request rejected, retrying unsorted");
                    self.get_page(&url, &token, page, false)
                }
                other => Ok(other),
            }
        })
        .with_window(window)
        .collect_all()
    }

    fn get_page(&self, url: &str, token: &str, page: u32, sorted: bool) -> AppResult<PageResponse> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if sorted {
            params.push(("sort", "-created_at".to_string()));
        }
        if page > 1 {
            params.push(("page", page.to_string()));
        }

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .query(&params)
            .send()?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Ok(PageResponse::Status(status.as_u16()));
        }

        Ok(parse_envelope(response.json::<Value>()?, page))
    }
}

/// Split an `{items, _meta}` envelope. A bare array is accepted as items
/// without paging metadata.
pub fn parse_envelope(body: Value, page: u32) -> PageResponse {
    match body {
        Value::Array(items) => PageResponse::list(items),
        Value::Object(mut map) => {
            let items = match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            let meta = map.get("_meta");
            let field = |key: &str| {
                meta.and_then(|m| m.get(key))
                    .and_then(Value::as_u64)
                    .map(|v| v as u32)
            };
            PageResponse::Records {
                items,
                meta: Some(PageMeta {
                    current_page: field("currentPage").unwrap_or(page),
                    page_count: field("pageCount").unwrap_or(MISSING_PAGE_COUNT),
                }),
            }
        }
        _ => PageResponse::list(Vec::new()),
    }
}

impl From<&[EndpointExtract]> for FusionDataset {
    fn from(endpoints: &[EndpointExtract]) -> Self {
        FusionDataset {
            endpoints: endpoints
                .iter()
                .map(|e| (e.name.clone(), e.records().to_vec()))
                .collect(),
        }
    }
}
