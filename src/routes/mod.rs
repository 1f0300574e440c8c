//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! `healithm serve` exposes the landing content as JSON under `/api/landing`
//! and, when a site directory is configured, the static marketing site at
//! `/`.

pub mod landing;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

fn api_routes() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/landing", get(landing::page))
        .route("/api/landing/{section}", get(landing::section))
        .route("/healthz", get(healthz))
        .layer(cors)
}

/// Full application router. `website_dir`, when given, is served as the
/// fallback for every non-API path.
pub fn app(website_dir: Option<&Path>) -> Router {
    let router = api_routes();
    let router = match website_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    };
    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
