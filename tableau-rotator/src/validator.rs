//! Response status validation.

use common::errors::ApiError;
use common::xml::parse_api_error;
use reqwest::{Response, StatusCode};

/// Checks that `response` carries the `expected` status.
///
/// On a mismatch the body is read and parsed as the server's error envelope.
/// The returned `ApiError` falls back to sentinels when the body is empty or
/// not an error document; callers wrap it in the error variant for their step.
pub async fn check_status(response: Response, expected: StatusCode) -> Result<Response, ApiError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = parse_api_error(&body);
    tracing::debug!(
        status = %status,
        expected = %expected,
        code = %error.code,
        "Unexpected response status"
    );
    Err(error)
}
