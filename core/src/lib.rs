pub mod aggregate;
pub mod chart;
pub mod client;
pub mod format;
pub mod query;
pub mod selection;

#[cfg(test)]
mod aggregate_tests;

// Re-exports for convenience
pub use aggregate::{Group, Label, group_by_digest};
pub use client::{ApiConfig, ApiError, CpuTimeParams, TopSqlApi, TopSqlClient};
pub use query::{
    Completion, POLL_INTERVAL, QueryCache, QueryState, QueryStatus, SeriesCache, SeriesKey, Ticket,
    fetch_series,
};
pub use selection::{Selection, SelectionAction};
pub use topsql_types::{CpuTimeSeries, Instance, TimeRange};
