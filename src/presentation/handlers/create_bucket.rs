use axum::{Extension, Json};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::services::SubmissionError;
use crate::infrastructure::observability::RequestId;
use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Debug, Deserialize)]
pub struct CreateBucketRequest {
    pub bucket_name: String,
}

#[derive(Serialize)]
pub struct CreateBucketResponse {
    pub job_id: String,
    pub bucket_name: String,
    pub status: String,
    pub message: String,
}

#[tracing::instrument(skip_all, fields(request_id = %request_id))]
pub async fn create_bucket_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<CreateBucketRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Malformed bucket creation request");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match state.submission_service.submit(&request.bucket_name).await {
        Ok(job) => (
            StatusCode::OK,
            Json(CreateBucketResponse {
                job_id: job.id.to_string(),
                bucket_name: job.bucket_name.into_inner(),
                status: job.status.as_str().to_string(),
                message: "Bucket creation job queued successfully".to_string(),
            }),
        )
            .into_response(),
        Err(SubmissionError::InvalidInput(e)) => {
            tracing::debug!(bucket_name = %request.bucket_name, error = %e, "Rejected bucket name");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to queue bucket creation");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to queue bucket creation: {}", e),
            )
        }
    }
}
