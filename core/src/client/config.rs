//! API endpoint configuration
//!
//! The backend address is fixed at build time. Set `TOPSQL_API_BASE_URL` when
//! compiling to point the dashboard somewhere other than the local default.

/// Base URL used when `TOPSQL_API_BASE_URL` is not set at build time
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8428/topsql/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL including the `/topsql/v1` prefix, without trailing slash
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Configuration baked in at compile time
    pub fn from_build_env() -> Self {
        Self::new(option_env!("TOPSQL_API_BASE_URL").unwrap_or(DEFAULT_BASE_URL))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ApiConfig::new("http://localhost:8428/topsql/v1//");
        assert_eq!(config.base_url, "http://localhost:8428/topsql/v1");
    }
}
