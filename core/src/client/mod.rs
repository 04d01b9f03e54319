//! Top SQL REST API client
//!
//! Typed wrappers around the two GET endpoints served under `/topsql/v1`:
//! - `/instances` - monitored instances
//! - `/cpu_time` - per SQL digest CPU time series
//!
//! Both endpoints answer with a `{ "data": ... }` envelope; only `data` is
//! returned to callers. Failures are propagated, never retried here.

mod config;
mod error;

use std::future::Future;

use serde::de::DeserializeOwned;
use topsql_types::{ApiResponse, CpuTimeSeries, Instance, TOP_UNLIMITED, TimeRange};

pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use error::ApiError;

// ─────────────────────────────────────────────────────────────────────────────
// Request Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Normalized query parameters for `GET /cpu_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTimeParams {
    pub instance: String,
    /// `None` leaves the cap to the backend; an empty selection becomes `"-1"`
    pub top: Option<String>,
    /// Range start in epoch seconds
    pub start: Option<f64>,
    /// Range end in epoch seconds
    pub end: Option<f64>,
    pub window: Option<String>,
}

impl CpuTimeParams {
    pub fn new(
        instance: &str,
        top: Option<&str>,
        time_range: Option<TimeRange>,
        window: Option<&str>,
    ) -> Self {
        let top = top.map(|t| {
            if t.is_empty() {
                TOP_UNLIMITED.to_string()
            } else {
                t.to_string()
            }
        });

        Self {
            instance: instance.to_string(),
            top,
            start: time_range.map(|r| r.start_secs()),
            end: time_range.map(|r| r.end_secs()),
            window: window.filter(|w| !w.is_empty()).map(str::to_string),
        }
    }

    /// Query string pairs in wire order. Absent parameters are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("instance", self.instance.clone())];
        if let Some(top) = &self.top {
            pairs.push(("top", top.clone()));
        }
        if let Some(start) = self.start {
            pairs.push(("start", start.to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end", end.to_string()));
        }
        if let Some(window) = &self.window {
            pairs.push(("window", window.clone()));
        }
        pairs
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API Trait
// ─────────────────────────────────────────────────────────────────────────────

/// The two backend calls the dashboard needs.
///
/// Futures are not required to be `Send`; the browser runs everything on a
/// single thread.
pub trait TopSqlApi {
    fn get_instances(&self) -> impl Future<Output = Result<Vec<Instance>, ApiError>>;

    fn get_cpu_time(
        &self,
        params: &CpuTimeParams,
    ) -> impl Future<Output = Result<Vec<CpuTimeSeries>, ApiError>>;

    /// Fetch CPU time series for a selection, normalizing the raw control values.
    fn get_cpu_time_data(
        &self,
        instance: &str,
        top: Option<&str>,
        time_range: Option<TimeRange>,
        window: Option<&str>,
    ) -> impl Future<Output = Result<Vec<CpuTimeSeries>, ApiError>> {
        let params = CpuTimeParams::new(instance, top, time_range, window);
        async move { self.get_cpu_time(&params).await }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the Top SQL API.
#[derive(Clone)]
pub struct TopSqlClient {
    base_url: String,
    client: reqwest::Client,
}

impl TopSqlClient {
    /// Create a client for the given endpoint. No timeout beyond transport defaults.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn instances_request(&self) -> Result<reqwest::Request, ApiError> {
        self.client
            .get(self.url("/instances"))
            .build()
            .map_err(|source| ApiError::Request {
                endpoint: "/instances",
                source,
            })
    }

    pub(crate) fn cpu_time_request(
        &self,
        params: &CpuTimeParams,
    ) -> Result<reqwest::Request, ApiError> {
        self.client
            .get(self.url("/cpu_time"))
            .query(&params.query_pairs())
            .build()
            .map_err(|source| ApiError::Request {
                endpoint: "/cpu_time",
                source,
            })
    }

    /// Execute a request and unwrap the `data` field of the envelope.
    /// A `null` payload is read as the empty value.
    async fn fetch_data<T>(&self, request: reqwest::Request) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let url = request.url().to_string();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        decode_envelope(&url, &body)
    }
}

impl TopSqlApi for TopSqlClient {
    async fn get_instances(&self) -> Result<Vec<Instance>, ApiError> {
        let instances: Vec<Instance> = self.fetch_data(self.instances_request()?).await?;
        tracing::debug!(count = instances.len(), "Fetched instances");
        Ok(instances)
    }

    async fn get_cpu_time(&self, params: &CpuTimeParams) -> Result<Vec<CpuTimeSeries>, ApiError> {
        let series: Vec<CpuTimeSeries> = self.fetch_data(self.cpu_time_request(params)?).await?;
        tracing::debug!(
            instance = %params.instance,
            digests = series.len(),
            "Fetched CPU time series"
        );
        Ok(series)
    }
}

fn decode_envelope<T>(url: &str, body: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    let envelope: ApiResponse<Option<T>> =
        serde_json::from_str(body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;
    Ok(envelope.data.unwrap_or_default())
}
