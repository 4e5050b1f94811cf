use thiserror::Error;

use crate::transfer::TenantRegion;

#[derive(Debug, Error)]
pub enum PartnerCenterError {
    #[error("Region {region} is missing required setting '{key}'")]
    Configuration {
        region: TenantRegion,
        key: &'static str,
    },

    #[error("Token exchange for region {region} rejected: {reason}")]
    Authentication {
        region: TenantRegion,
        reason: String,
    },

    #[error("Invalid Partner Center endpoint: {0}")]
    Endpoint(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Partner Center returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}
