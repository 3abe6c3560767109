// ABOUTME: Product extraction endpoint: POST /api/extract with {"url": "..."}.
// ABOUTME: Validates the URL, fetches and extracts the page, and maps failures to ApiError.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, Uri},
    Json,
};
use closet_extract::ExtractedProduct;
use serde::Deserialize;
use url::Url;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ExtractRequest {
    url: Option<String>,
}

/// Reads the target URL from a request body.
///
/// Anything other than a JSON object with a non-empty string `url` counts as missing.
fn requested_url(body: &[u8]) -> Result<String, ApiError> {
    let url = serde_json::from_slice::<ExtractRequest>(body)
        .ok()
        .and_then(|req| req.url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    match Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url),
        _ => Err(ApiError::InvalidUrl),
    }
}

pub async fn extract_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ExtractedProduct>, ApiError> {
    let url = requested_url(&body)?;
    tracing::info!(url = %url, "extracting product");

    match state.client.extract_url(&url).await {
        Ok(product) => {
            tracing::debug!(
                url = %url,
                images = product.images.len(),
                has_price = product.has_price(),
                empty = product.is_empty(),
                "extraction complete"
            );
            Ok(Json(product))
        }
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "extraction failed");
            Err(err.into())
        }
    }
}

/// JSON 404 for any route without a handler.
pub async fn not_found_handler(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
