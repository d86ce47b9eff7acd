//! Runtime configuration.
//!
//! Loaded once at startup from environment variables and passed explicitly
//! to the components that need it.

use std::time::Duration;

/// Default Tableau REST API version.
pub const DEFAULT_API_VERSION: &str = "2.8";
/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Largest page size the REST API accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// REST API version used in every request path.
    pub api_version: String,
    /// Site content URL used at sign-in (empty string is the default site).
    pub site: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Page size for data source and workbook listings.
    pub page_size: u32,
    /// When set, a workbook is only eligible if all its connections have this type.
    pub workbook_connection_type: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            site: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            workbook_connection_type: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            api_version: non_empty("ROTATOR_API_VERSION").unwrap_or(defaults.api_version),
            site: lookup("ROTATOR_SITE")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.site),
            request_timeout_secs: non_empty("ROTATOR_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.request_timeout_secs),
            page_size: non_empty("ROTATOR_PAGE_SIZE")
                .and_then(|v| v.parse::<u32>().ok())
                .map(|size| size.clamp(1, MAX_PAGE_SIZE))
                .unwrap_or(defaults.page_size),
            workbook_connection_type: non_empty("ROTATOR_WORKBOOK_CONNECTION_TYPE"),
        }
    }

    /// Per-request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
