//! Health check handler

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{Json, http::StatusCode};
use utoipa::ToSchema;

use super::super::types::ApiResponse;

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
    /// Build revision (short git hash)
    #[schema(example = "3f2a1bc")]
    pub version: &'static str,
}

/// Health check endpoint
///
/// Liveness only: upstream credentials and downstream endpoints are not
/// probed, so a 200 here says nothing about Partner Center reachability.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check() -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    (
        StatusCode::OK,
        Json(ApiResponse::success(HealthResponse {
            timestamp_ms: now_ms,
            version: env!("GIT_HASH"),
        })),
    )
}
