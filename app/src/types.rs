//! Frontend view types
//!
//! Owned snapshots of cache state the components render from. Re-exports the
//! shared types so components import from one place.

use topsql_core::{QueryState, QueryStatus};

pub use topsql_core::{Group, Selection, SelectionAction, SeriesKey};
pub use topsql_types::{CpuTimeSeries, Instance, TimeRange};

/// Render-ready copy of the series query for the current key
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot {
    pub status: QueryStatus,
    pub data: Option<Vec<CpuTimeSeries>>,
    pub error: Option<String>,
    pub is_fetching: bool,
}

impl SeriesSnapshot {
    /// No instance selected, nothing requested
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
        }
    }
}

impl From<QueryState<'_, Vec<CpuTimeSeries>>> for SeriesSnapshot {
    fn from(state: QueryState<'_, Vec<CpuTimeSeries>>) -> Self {
        Self {
            status: state.status,
            data: state.data.cloned(),
            error: state.error.map(str::to_string),
            is_fetching: state.is_fetching,
        }
    }
}
