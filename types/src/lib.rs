//! Shared types for the Top SQL dashboard
//!
//! This crate contains the serializable types that travel over the REST API and
//! the client-side selection types shared between the core crate and the WASM
//! frontend.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

/// JSON envelope wrapping every API response: `{ "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// A monitored instance, as listed by `GET /instances`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    /// Instance identifier (e.g. `127.0.0.1:10080`), used as the series query key
    pub instance: String,
    /// Job label the instance belongs to (e.g. `tidb`)
    pub job: String,
}

impl Instance {
    /// Label shown in the instance selector: `"{job} - {instance}"`
    pub fn label(&self) -> String {
        format!("{} - {}", self.job, self.instance)
    }
}

/// Raw CPU time series for one SQL digest, as returned by `GET /cpu_time`.
///
/// `timestamp_secs[i]` pairs with `cpu_time_millis[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CpuTimeSeries {
    pub sql_digest: String,
    #[serde(default)]
    pub plan_digest: String,
    #[serde(default)]
    pub sql_text: String,
    #[serde(default)]
    pub plan_text: String,
    #[serde(default)]
    pub timestamp_secs: Vec<u64>,
    #[serde(default)]
    pub cpu_time_millis: Vec<u64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection Types
// ─────────────────────────────────────────────────────────────────────────────

/// Absolute time range in epoch milliseconds, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeRange {
    /// Build a range, swapping the ends if they arrive reversed.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        if start_ms <= end_ms {
            Self { start_ms, end_ms }
        } else {
            Self {
                start_ms: end_ms,
                end_ms: start_ms,
            }
        }
    }

    /// Start as epoch seconds (fractional part kept)
    pub fn start_secs(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    /// End as epoch seconds (fractional part kept)
    pub fn end_secs(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }
}

/// Sentinel sent as `top` when no cardinality cap applies.
pub const TOP_UNLIMITED: &str = "-1";

/// Choices offered by the "Select Top" control.
pub const TOP_OPTIONS: &[&str] = &["2", "5", "10", "20", "50", "100"];

/// Choices offered by the "Select Window" control. Passed to the backend as-is.
pub const WINDOW_OPTIONS: &[&str] = &["1m", "5m", "20m", "30m", "1h", "3h", "6h", "12h", "24h"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_new_orders_ends() {
        let range = TimeRange::new(2_000, 1_000);
        assert_eq!(range.start_ms, 1_000);
        assert_eq!(range.end_ms, 2_000);
    }

    #[test]
    fn test_time_range_secs_keep_fraction() {
        let range = TimeRange::new(1_620_000_000_123, 1_620_000_060_000);
        assert_eq!(range.start_secs(), 1_620_000_000.123);
        assert_eq!(range.end_secs(), 1_620_000_060.0);
    }

    #[test]
    fn test_cpu_time_series_missing_fields_default() {
        let json = r#"{"sql_digest":"abc","timestamp_secs":[1],"cpu_time_millis":[5]}"#;
        let series: CpuTimeSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.sql_digest, "abc");
        assert!(series.sql_text.is_empty());
        assert!(series.plan_digest.is_empty());
        assert_eq!(series.timestamp_secs, vec![1]);
        assert_eq!(series.cpu_time_millis, vec![5]);
    }

    #[test]
    fn test_instance_envelope_and_label() {
        let json = r#"{"data":[{"instance":"127.0.0.1:10080","job":"tidb"}]}"#;
        let resp: ApiResponse<Vec<Instance>> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].label(), "tidb - 127.0.0.1:10080");
    }
}
