//! Service Fusion entity shapes.
//!
//! Only the fields the job summary reads are typed; the raw JSON objects are
//! kept alongside for the per-endpoint dump sheets.

use super::ids::{opt_id, opt_number, opt_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A job, or an estimate standing in for one.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Job {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_id")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "opt_number")]
    pub total: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Invoice {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    /// Customer display name; invoices are partitioned on this.
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "opt_number")]
    pub total: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

/// The four Service Fusion collections, in extraction order.
pub const FUSION_ENDPOINTS: [&str; 4] = ["customers", "jobs", "estimates", "invoices"];

/// Raw records per endpoint, in extraction order.
#[derive(Debug, Clone, Default)]
pub struct FusionDataset {
    pub endpoints: Vec<(String, Vec<Value>)>,
}

impl FusionDataset {
    pub fn records(&self, endpoint: &str) -> &[Value] {
        self.endpoints
            .iter()
            .find(|(name, _)| name == endpoint)
            .map(|(_, records)| records.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_records(&self) -> usize {
        self.endpoints.iter().map(|(_, r)| r.len()).sum()
    }
}
