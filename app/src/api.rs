//! Top SQL API access for the frontend
//!
//! Holds the one HTTP client the page uses and exposes the backend calls as
//! plain async functions, so components never build requests themselves.

use std::cell::RefCell;

use topsql_core::{ApiConfig, ApiError, SeriesKey, Ticket, TopSqlApi, TopSqlClient};
use topsql_types::{CpuTimeSeries, Instance};

thread_local! {
    static CLIENT: RefCell<Option<TopSqlClient>> = const { RefCell::new(None) };
}

/// Shared client, created on first use from the build-time endpoint
fn client() -> Result<TopSqlClient, ApiError> {
    CLIENT.with(|cell| {
        if let Some(client) = cell.borrow().as_ref() {
            return Ok(client.clone());
        }
        let client = TopSqlClient::new(&ApiConfig::from_build_env())?;
        tracing::info!(base_url = client.base_url(), "Created Top SQL API client");
        *cell.borrow_mut() = Some(client.clone());
        Ok(client)
    })
}

/// List monitored instances
pub async fn get_instances() -> Result<Vec<Instance>, ApiError> {
    client()?.get_instances().await
}

/// Run the series fetch a cache ticket was issued for
pub async fn fetch_series(
    ticket: Ticket<SeriesKey>,
) -> (Ticket<SeriesKey>, Result<Vec<CpuTimeSeries>, ApiError>) {
    match client() {
        Ok(client) => topsql_core::fetch_series(&client, ticket).await,
        Err(err) => (ticket, Err(err)),
    }
}
