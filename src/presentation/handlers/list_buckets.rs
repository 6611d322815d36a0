use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

use super::error_response::error_response;

#[derive(Serialize)]
pub struct BucketSummary {
    pub name: String,
    pub tx_hash: Option<String>,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ListBucketsResponse {
    pub buckets: Vec<BucketSummary>,
    pub count: usize,
}

#[tracing::instrument(skip(state))]
pub async fn list_buckets_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.status_service.list_completed_buckets().await {
        Ok(completed) => {
            let buckets: Vec<BucketSummary> = completed
                .into_iter()
                .map(|b| BucketSummary {
                    name: b.bucket_name.into_inner(),
                    tx_hash: b.result_reference,
                    created_at: b.created_at.to_rfc3339(),
                })
                .collect();
            let count = buckets.len();
            (StatusCode::OK, Json(ListBucketsResponse { buckets, count })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list buckets");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        }
    }
}
