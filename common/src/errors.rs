//! Error types shared by all components.
//!
//! Every failure aborts the rotation run; nothing here is retried or
//! downgraded to a warning.

use serde::Serialize;
use thiserror::Error;

/// Result alias used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

/// Sentinel used when the error envelope carries no code.
pub const UNKNOWN_CODE: &str = "unknown";
/// Sentinel used when the error envelope carries no summary.
pub const UNKNOWN_SUMMARY: &str = "unknown summary";
/// Sentinel used when the error envelope carries no detail.
pub const UNKNOWN_DETAIL: &str = "unknown detail";

/// Structured error reported by the Tableau server.
///
/// Always constructible: fields missing from the response body fall back to
/// the `UNKNOWN_*` sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Tableau error code, e.g. `401002`.
    pub code: String,
    /// Short error summary.
    pub summary: String,
    /// Detailed error message.
    pub detail: String,
}

impl ApiError {
    /// Builds an error from optional parts, filling in the sentinels.
    pub fn new(code: Option<String>, summary: Option<String>, detail: Option<String>) -> Self {
        Self {
            code: code.unwrap_or_else(|| UNKNOWN_CODE.to_string()),
            summary: summary.unwrap_or_else(|| UNKNOWN_SUMMARY.to_string()),
            detail: detail.unwrap_or_else(|| UNKNOWN_DETAIL.to_string()),
        }
    }

    /// An error with every field set to its sentinel.
    pub fn unknown() -> Self {
        Self::new(None, None, None)
    }
}

impl Default for ApiError {
    fn default() -> Self {
        Self::unknown()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} - {}", self.code, self.summary, self.detail)
    }
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Sign-in or sign-out was rejected by the server.
    #[error("Authentication failed: {0}")]
    Auth(ApiError),

    /// An enumeration returned no resources.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A connection update was rejected by the server.
    #[error("Connection update failed: {0}")]
    Update(ApiError),

    /// Invalid invocation or configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other request rejected by the server.
    #[error("Server request failed: {0}")]
    Api(ApiError),

    /// The request never produced a response (connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response or request body could not be encoded or decoded.
    #[error("Malformed payload: {0}")]
    Decode(String),
}

impl AppError {
    /// Returns the machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Update(_) => "UPDATE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Api(_) => "API_ERROR",
            AppError::Transport(_) => "TRANSPORT_ERROR",
            AppError::Decode(_) => "DECODE_ERROR",
        }
    }

    /// Returns the server-side error, when the failure came from a response.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            AppError::Auth(e) | AppError::Update(e) | AppError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_defaults() {
        let err = ApiError::new(Some("400009".into()), None, None);
        assert_eq!(err.code, "400009");
        assert_eq!(err.summary, UNKNOWN_SUMMARY);
        assert_eq!(err.detail, UNKNOWN_DETAIL);
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(
            Some("401002".into()),
            Some("Unauthorized Access".into()),
            Some("Invalid authentication credentials".into()),
        );
        assert_eq!(
            err.to_string(),
            "401002: Unauthorized Access - Invalid authentication credentials"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::Config("missing".into()).exit_code(), 2);
        assert_eq!(AppError::Auth(ApiError::unknown()).exit_code(), 1);
        assert_eq!(AppError::NotFound("datasources".into()).exit_code(), 1);
    }

    #[test]
    fn test_api_error_accessor() {
        let err = AppError::Update(ApiError::new(Some("409".into()), None, None));
        assert_eq!(err.api_error().map(|e| e.code.as_str()), Some("409"));
        assert!(AppError::Transport("timeout".into()).api_error().is_none());
    }
}
