//! Landing content routes.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Json;

use crate::landing;

/// `GET /api/landing`: the whole page.
pub async fn page() -> Json<landing::LandingPage> {
    Json(landing::landing_page())
}

/// `GET /api/landing/{section}`: one section, 404 for unknown names.
pub async fn section(Path(name): Path<String>) -> Result<Json<serde_json::Value>, StatusCode> {
    landing::section(&name).map(Json).ok_or(StatusCode::NOT_FOUND)
}
