use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

#[derive(Serialize)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub status: String,
    pub version: String,
}

pub async fn service_info_handler() -> impl IntoResponse {
    Json(ServiceInfoResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.status_service.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                database: "connected".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Database error: {}", e),
            )
        }
    }
}
