//! Create-transfer handler

use std::sync::Arc;

use axum::extract::State;
use tracing::{error, info};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, CreateTransferRequest, CreateTransferResponse, ValidatedJson, ok,
};
use crate::transfer::RelayError;

/// Create a new-commerce transfer in Partner Center
#[utoipa::path(
    post,
    path = "/create-transfer",
    request_body = CreateTransferRequest,
    responses(
        (status = 200, description = "Transfer created", body = CreateTransferResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Partner Center failure")
    ),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateTransferRequest>,
) -> ApiResult<CreateTransferResponse> {
    let region = req.tenant_region;

    let record = state
        .partner_center
        .create_transfer(region, req.customer_id, &req.to_new_transfer())
        .await
        .map_err(|e| {
            let e = RelayError::from(e);
            error!(
                region = %region,
                customer_id = %req.customer_id,
                code = e.code(),
                "Create transfer failed: {}",
                e
            );
            ApiError::from(e)
        })?;

    info!(
        region = %region,
        customer_id = %req.customer_id,
        transfer_id = %record.id,
        "Transfer created"
    );
    ok(CreateTransferResponse::from(record))
}
