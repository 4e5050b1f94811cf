//! Cumulus / Frontdesk billing adapters over HTTP

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::{ImportOutcome, ImportService, TransferForwarder};
use crate::transfer::error::RelayError;
use crate::transfer::types::TransferRecord;

const API_KEY_HEADER: &str = "x-api-key";

/// Posts the transfer JSON to the downstream billing endpoint
pub struct HttpForwarder {
    http: reqwest::Client,
    url: String,
}

impl HttpForwarder {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl TransferForwarder for HttpForwarder {
    fn name(&self) -> &'static str {
        "billing-http"
    }

    async fn forward(&self, transfer: &TransferRecord) -> Result<(), RelayError> {
        let response = self
            .http
            .post(&self.url)
            .json(transfer)
            .send()
            .await
            .map_err(|e| RelayError::DownstreamForward(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(transfer_id = %transfer.id, status = status.as_u16(), "Downstream rejected transfer");
            return Err(RelayError::DownstreamForward(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        debug!(transfer_id = %transfer.id, status = status.as_u16(), "Transfer forwarded");
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest<'a> {
    organization_id: &'a str,
}

/// Calls the Cumulus import RPC
pub struct HttpImportService {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpImportService {
    pub fn new(http: reqwest::Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ImportService for HttpImportService {
    fn name(&self) -> &'static str {
        "cumulus-import"
    }

    async fn import(&self, organization_id: &str) -> Result<ImportOutcome, RelayError> {
        let mut request = self
            .http
            .post(&self.url)
            .json(&ImportRequest { organization_id });
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RelayError::Import(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Import(format!("HTTP {}", status.as_u16())));
        }

        response
            .json::<ImportOutcome>()
            .await
            .map_err(|e| RelayError::Import(format!("invalid import response: {}", e)))
    }
}

/// Stand-in when no import endpoint is configured
pub struct DisabledImportService;

#[async_trait]
impl ImportService for DisabledImportService {
    fn name(&self) -> &'static str {
        "import-disabled"
    }

    async fn import(&self, _organization_id: &str) -> Result<ImportOutcome, RelayError> {
        Ok(ImportOutcome::failure("import endpoint not configured"))
    }
}
