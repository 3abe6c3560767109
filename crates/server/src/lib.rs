// ABOUTME: HTTP service exposing the closet product extractor over JSON.
// ABOUTME: Builds the axum router with shared state, CORS, request tracing, and a JSON 404 fallback.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use closet_extract::Client;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use crate::config::Config;
pub use crate::error::ApiError;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<Client>,
}

impl AppState {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// Build the application router.
pub fn build_app(state: AppState) -> Router {
    // Mobile clients call from arbitrary origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health_handler))
        .route("/api/extract", post(routes::extract_handler))
        .fallback(routes::not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
