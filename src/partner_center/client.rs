//! Partner Center REST client (transfers)

use std::sync::Arc;

use reqwest::Url;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::auth::TokenCache;
use super::error::PartnerCenterError;
use crate::transfer::{TenantRegion, TransferRecord, TransferReference};

/// Correlation header Partner Center echoes into its own logs
const CORRELATION_HEADER: &str = "MS-CorrelationId";

/// Body of `POST /v1/customers/{customerId}/transfers`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    pub customer_email_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub source_partner_name: String,
    pub source_partner_tenant_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_partner_tenant_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_partner_email_id: Option<String>,
    pub transfer_type: i32,
}

pub struct PartnerCenterClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenCache>,
}

impl PartnerCenterClient {
    pub fn new(http: reqwest::Client, base_url: &str, tokens: Arc<TokenCache>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// `GET /v1/customers/{customerId}/transfers/{transferId}`
    pub async fn get_transfer(
        &self,
        region: TenantRegion,
        reference: &TransferReference,
    ) -> Result<TransferRecord, PartnerCenterError> {
        let token = self.tokens.get_token(region).await?;
        let url = self.endpoint(&[
            "v1",
            "customers",
            &reference.customer_id,
            "transfers",
            &reference.transfer_id,
        ])?;
        let correlation_id = Uuid::new_v4();
        debug!(region = %region, %correlation_id, url = %url, "Fetching transfer");

        let response = self
            .http
            .get(url)
            .bearer_auth(&token.token)
            .header(CORRELATION_HEADER, correlation_id.to_string())
            .send()
            .await?;

        Self::decode(response, correlation_id).await
    }

    /// `POST /v1/customers/{customerId}/transfers`
    pub async fn create_transfer(
        &self,
        region: TenantRegion,
        customer_id: Uuid,
        transfer: &NewTransfer,
    ) -> Result<TransferRecord, PartnerCenterError> {
        let token = self.tokens.get_token(region).await?;
        let customer_id = customer_id.to_string();
        let url = self.endpoint(&["v1", "customers", &customer_id, "transfers"])?;
        let correlation_id = Uuid::new_v4();
        debug!(region = %region, %correlation_id, url = %url, "Creating transfer");

        let response = self
            .http
            .post(url)
            .bearer_auth(&token.token)
            .header(CORRELATION_HEADER, correlation_id.to_string())
            .json(transfer)
            .send()
            .await?;

        Self::decode(response, correlation_id).await
    }

    /// `base_url` plus `segments`, each percent-encoded as exactly one path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PartnerCenterError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(PartnerCenterError::Endpoint(format!(
                "invalid path segment '{}'",
                bad
            )));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PartnerCenterError::Endpoint(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                PartnerCenterError::Endpoint(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode(
        response: reqwest::Response,
        correlation_id: Uuid,
    ) -> Result<TransferRecord, PartnerCenterError> {
        let status = response.status();
        if !status.is_success() {
            warn!(%correlation_id, status = status.as_u16(), "Partner Center call failed");
            return Err(PartnerCenterError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<TransferRecord>()
            .await
            .map_err(|e| PartnerCenterError::Decode(e.to_string()))
    }
}
