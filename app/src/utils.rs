//! Utility functions
//!
//! Label helpers used by the dashboard controls.

use topsql_core::format::format_full;

use crate::types::TimeRange;

/// Text of the reset control for the brushed range
pub fn reset_label(range: &TimeRange) -> String {
    format!(
        "Reset Time Range (now: {} ~ {})",
        format_full(range.start_ms),
        format_full(range.end_ms)
    )
}

/// Value a `<select>` should show; placeholders use the empty value
pub fn select_value(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}
