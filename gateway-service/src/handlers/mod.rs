//! HTTP handlers for gateway-service.

pub mod invoice;

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "gateway-service" })),
    )
}
