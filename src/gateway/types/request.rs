//! Request/response DTOs and the validating JSON extractor

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::response::ApiError;
use crate::partner_center::NewTransfer;
use crate::transfer::{RelayOutcome, TRANSFER_TYPE_NEW_COMMERCE, TenantRegion, TransferRecord};

// ============================================================================
// ValidatedJson: Axum Framework Integration
// ============================================================================

/// JSON body that has passed `validator` checks.
///
/// Malformed JSON and failed validation both become 400 with the standard
/// envelope instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

        value
            .validate()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        Ok(ValidatedJson(value))
    }
}

// ============================================================================
// Create Transfer
// ============================================================================

/// Create a new-commerce transfer for a customer
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    /// Region of the tenant: `US`, `CA` or `EU`
    #[schema(value_type = String, example = "CA")]
    pub tenant_region: TenantRegion,
    /// Customer whose subscriptions are transferred
    pub customer_id: Uuid,
    /// Partner initiating the transfer
    pub source_partner_tenant_id: Uuid,
    /// Organization name of the initiating partner
    #[validate(length(min = 1, message = "sourcePartnerName must not be empty"))]
    pub source_partner_name: String,
    /// Customer contact notified of the transfer
    #[validate(email(message = "customerEmailId must be a valid email"))]
    pub customer_email_id: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Partner the transfer is targeted at
    #[serde(default)]
    pub target_partner_tenant_id: Option<Uuid>,
    #[serde(default)]
    #[validate(email(message = "targetPartnerEmailId must be a valid email"))]
    pub target_partner_email_id: Option<String>,
}

impl CreateTransferRequest {
    pub fn to_new_transfer(&self) -> NewTransfer {
        NewTransfer {
            customer_email_id: self.customer_email_id.clone(),
            customer_name: self.customer_name.clone(),
            source_partner_name: self.source_partner_name.trim().to_string(),
            source_partner_tenant_id: self.source_partner_tenant_id,
            target_partner_tenant_id: self.target_partner_tenant_id,
            target_partner_email_id: self.target_partner_email_id.clone(),
            transfer_type: TRANSFER_TYPE_NEW_COMMERCE,
        }
    }
}

/// Identity of the transfer Partner Center created
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferResponse {
    #[schema(example = "a9c6e1f0-3e3c-4b8e-8d0b-1f2e3d4c5b6a")]
    pub transfer_id: String,
    #[schema(example = "Active")]
    pub status: String,
    pub customer_tenant_id: String,
}

impl From<TransferRecord> for CreateTransferResponse {
    fn from(record: TransferRecord) -> Self {
        Self {
            transfer_id: record.id,
            status: record.status.into(),
            customer_tenant_id: record.customer_tenant_id,
        }
    }
}

// ============================================================================
// Webhook
// ============================================================================

/// Acknowledgement for a relayed webhook
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub transfer_id: String,
    /// `FORWARD` or `TRIGGER_IMPORT`
    #[schema(example = "TRIGGER_IMPORT")]
    pub decision: String,
    /// Absent when no import was attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_succeeded: Option<bool>,
}

impl From<RelayOutcome> for WebhookAck {
    fn from(outcome: RelayOutcome) -> Self {
        Self {
            transfer_id: outcome.transfer_id,
            decision: outcome.decision.as_str().to_string(),
            import_succeeded: outcome.import_succeeded,
        }
    }
}
