pub mod date_range;
pub mod fusion;
pub mod ids;
pub mod kimai;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode typed records, skipping (and logging) the ones that do not fit.
pub fn decode_records<T: DeserializeOwned>(endpoint: &str, raw: &[Value]) -> Vec<T> {
    raw.iter()
        .filter_map(|value| match serde_json::from_value::<T>(value.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(endpoint, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect()
}
