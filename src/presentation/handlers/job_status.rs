use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::StatusError;
use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub bucket_name: String,
    pub status: String,
    pub tx_hash: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    // An id that is not a UUID cannot name any job.
    let Ok(id) = job_id.parse::<JobId>() else {
        return error_response(StatusCode::NOT_FOUND, "Job not found");
    };

    match state.status_service.get_status(id).await {
        Ok(job) => {
            let response = JobStatusResponse {
                job_id: job.id.to_string(),
                bucket_name: job.bucket_name.into_inner(),
                status: job.status.as_str().to_string(),
                tx_hash: job.result_reference,
                error: job.error_detail,
                created_at: job.created_at.to_rfc3339(),
                updated_at: job.updated_at.to_rfc3339(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(StatusError::NotFound(_)) => error_response(StatusCode::NOT_FOUND, "Job not found"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job status");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        }
    }
}
