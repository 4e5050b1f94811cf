//! Relay Error Types
//!
//! One variant per failure class of the webhook pipeline. Every class except
//! `PolicyRejection` surfaces as a generic 500; `Import` is only ever logged.

use thiserror::Error;

use super::policy::RejectReason;
use crate::partner_center::PartnerCenterError;

#[derive(Error, Debug, Clone)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("{0}")]
    PolicyRejection(RejectReason),

    #[error("Downstream forward failed: {0}")]
    DownstreamForward(String),

    #[error("Import failed: {0}")]
    Import(String),
}

impl RelayError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::Configuration(_) => "CONFIGURATION_ERROR",
            RelayError::Authentication(_) => "AUTHENTICATION_ERROR",
            RelayError::UpstreamFetch(_) => "UPSTREAM_FETCH_ERROR",
            RelayError::PolicyRejection(_) => "POLICY_REJECTION",
            RelayError::DownstreamForward(_) => "DOWNSTREAM_FORWARD_ERROR",
            RelayError::Import(_) => "IMPORT_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            RelayError::PolicyRejection(_) => 409,
            RelayError::Configuration(_)
            | RelayError::Authentication(_)
            | RelayError::UpstreamFetch(_)
            | RelayError::DownstreamForward(_)
            | RelayError::Import(_) => 500,
        }
    }
}

impl From<PartnerCenterError> for RelayError {
    fn from(e: PartnerCenterError) -> Self {
        match e {
            PartnerCenterError::Configuration { .. } => RelayError::Configuration(e.to_string()),
            PartnerCenterError::Authentication { .. } => RelayError::Authentication(e.to_string()),
            PartnerCenterError::Endpoint(_)
            | PartnerCenterError::Request(_)
            | PartnerCenterError::UpstreamStatus { .. }
            | PartnerCenterError::Decode(_) => RelayError::UpstreamFetch(e.to_string()),
        }
    }
}
