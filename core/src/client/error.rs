//! Error types for API calls

use thiserror::Error;

/// Errors while talking to the Top SQL API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("invalid request for {endpoint}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
