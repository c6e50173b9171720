use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::errors;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "Not found")
}

pub async fn method_not_allowed() -> axum::response::Response {
    errors::json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
