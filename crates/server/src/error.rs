// ABOUTME: API error type mapping request and fetch failures onto HTTP statuses.
// ABOUTME: Every error renders as a JSON body of the form {"error": message}.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use closet_extract::{ErrorCode, FetchError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("Failed to fetch URL: {reason}")]
    Upstream { status: u16, reason: String },

    #[error("Request timeout - URL took too long to respond")]
    Timeout,

    #[error("URL points to a private network address")]
    Blocked,

    #[error("Failed to extract content from URL: {0}")]
    Fetch(String),

    #[error("Route not found: {method} {path}")]
    RouteNotFound { method: String, path: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Blocked => StatusCode::FORBIDDEN,
            ApiError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err.code {
            ErrorCode::InvalidUrl => ApiError::InvalidUrl,
            ErrorCode::Timeout => ApiError::Timeout,
            ErrorCode::Ssrf => ApiError::Blocked,
            ErrorCode::HttpStatus(status) => ApiError::Upstream {
                status,
                reason: StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown status")
                    .to_string(),
            },
            ErrorCode::Fetch => ApiError::Fetch(
                err.source
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "request failed".to_string()),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fetch_error_mapping() {
        let err: ApiError = FetchError::http_status("u", "Fetch", 404).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Failed to fetch URL: Not Found");

        let err: ApiError = FetchError::timeout("u", "Fetch", None).into();
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);

        let err: ApiError = FetchError::ssrf("u", "Fetch", None).into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err: ApiError = FetchError::fetch("u", "Fetch", Some(anyhow::anyhow!("boom"))).into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Failed to extract content from URL: boom");
    }

    #[test]
    fn test_non_error_upstream_status_is_bad_gateway() {
        let err: ApiError = FetchError::http_status("u", "Fetch", 304).into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
