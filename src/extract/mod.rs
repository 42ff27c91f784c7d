pub mod fusion;
pub mod kimai;
pub mod pager;

pub use fusion::FusionClient;
pub use kimai::KimaiClient;
pub use pager::{Extraction, PageLimits, PageMeta, PageResponse, Paginator, RecencyWindow, StopReason};

use serde_json::Value;

/// Result of extracting one named endpoint.
#[derive(Debug, Clone)]
pub struct EndpointExtract {
    pub name: String,
    pub extraction: Extraction,
}

impl EndpointExtract {
    pub fn new(name: &str, extraction: Extraction) -> Self {
        Self {
            name: name.to_string(),
            extraction,
        }
    }

    pub fn records(&self) -> &[Value] {
        &self.extraction.records
    }

    pub fn failed(&self) -> bool {
        self.extraction.failed()
    }

    pub(crate) fn log_outcome(&self) {
        let count = self.extraction.records.len();
        if self.failed() {
            tracing::error!(endpoint = %self.name, reason = %self.extraction.stop, "no data retrieved");
        } else if count == 0 {
            tracing::warn!(endpoint = %self.name, "endpoint returned no records");
        } else {
            tracing::info!(
                endpoint = %self.name,
                records = count,
                pages = self.extraction.pages,
                "loaded records"
            );
        }
    }
}
