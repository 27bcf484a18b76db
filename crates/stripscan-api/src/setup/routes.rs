//! Route configuration and setup.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use stripscan_core::Config;

use crate::handlers;
use crate::state::AppState;

/// Slack on top of the configured upload cap so the multipart envelope of a
/// maximum-size file still reaches the handler's own size check (which
/// returns the friendly 413).
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

fn setup_cors(config: &Config) -> Result<CorsLayer> {
    if config.cors_origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}

async fn openapi_json() -> impl IntoResponse {
    Json(crate::api_doc::ApiDoc::openapi())
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(config)?;
    let body_limit = config.max_upload_size_bytes + BODY_LIMIT_SLACK;

    let api = Router::new()
        .route("/api/test-strips/upload", post(handlers::upload_test_strip))
        .route("/api/test-strips", get(handlers::list_test_strips))
        .route("/api/test-strips/{id}", get(handlers::get_test_strip))
        .route("/health", get(handlers::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state.clone());

    // Uploaded originals and thumbnails are served straight from the shared
    // upload directory.
    let router = api
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit));

    Ok(router)
}
