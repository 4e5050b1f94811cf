//! Partner Center transfer webhooks
//!
//! Every region is served by [`transfer_webhook`]; the route a request
//! arrived on decides which region's credentials are used.

use std::sync::Arc;

use axum::extract::State;
use tracing::{error, info};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ValidatedJson, WebhookAck, ok};
use crate::transfer::{RelayError, TenantRegion, TransferEvent};

/// Relay a transfer lifecycle event
///
/// The documented `{region}` is bound at routing time: the gateway registers
/// `/transfer-webhook-us`, `/transfer-webhook-ca` and `/transfer-webhook-eu`.
#[utoipa::path(
    post,
    path = "/transfer-webhook-{region}",
    params(
        ("region" = String, Path, description = "Tenant region in lower case: us, ca or eu")
    ),
    request_body = TransferEvent,
    responses(
        (status = 200, description = "Event relayed", body = WebhookAck),
        (status = 400, description = "Malformed event body"),
        (status = 409, description = "Transfer rejected by dispatch policy"),
        (status = 500, description = "Configuration, upstream or downstream failure")
    ),
    tag = "Webhook"
)]
pub async fn transfer_webhook(
    region: TenantRegion,
    State(state): State<Arc<AppState>>,
    ValidatedJson(event): ValidatedJson<TransferEvent>,
) -> ApiResult<WebhookAck> {
    info!(region = %region, event = %event.event_name, "Transfer webhook received");

    match state.relay.relay(region, &event).await {
        Ok(outcome) => ok(WebhookAck::from(outcome)),
        Err(e) => {
            log_failure(region, &e);
            Err(ApiError::from(e))
        }
    }
}

fn log_failure(region: TenantRegion, e: &RelayError) {
    match e {
        RelayError::PolicyRejection(reason) => {
            info!(region = %region, code = e.code(), "Transfer rejected: {}", reason)
        }
        _ => error!(region = %region, code = e.code(), "Transfer relay failed: {}", e),
    }
}
