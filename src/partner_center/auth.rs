//! Per-region bearer token cache
//!
//! Each tenant region holds at most one token. A read returns the cached
//! token while `expires_at` is strictly in the future; otherwise the region's
//! long-lived refresh token is exchanged for a new one and the entry is
//! overwritten wholesale.
//!
//! Concurrent refreshes for the same region are not serialized: both callers
//! hit the token endpoint and the last insert wins. Tokens from either
//! exchange carry the same capability, so nothing is lost.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::error::PartnerCenterError;
use crate::config::{PartnerCenterConfig, RegionCredentials, RegionsConfig};
use crate::transfer::TenantRegion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    #[inline]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// OAuth token endpoint reply
#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
    expires_on: UnixSeconds,
}

/// `expires_on` arrives as a string of Unix seconds; some tenants send a number
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum UnixSeconds {
    Number(i64),
    Text(String),
}

impl UnixSeconds {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = match self {
            UnixSeconds::Number(n) => *n,
            UnixSeconds::Text(s) => s.trim().parse().ok()?,
        };
        DateTime::from_timestamp(secs, 0)
    }
}

pub struct TokenCache {
    http: reqwest::Client,
    login_url: String,
    scope: String,
    regions: RegionsConfig,
    tokens: DashMap<TenantRegion, AuthToken>,
}

impl TokenCache {
    pub fn new(http: reqwest::Client, config: &PartnerCenterConfig) -> Self {
        Self {
            http,
            login_url: config.login_url.trim_end_matches('/').to_string(),
            scope: config.scope.clone(),
            regions: config.regions.clone(),
            tokens: DashMap::new(),
        }
    }

    /// Valid bearer token for `region`, refreshing it when absent or expired
    pub async fn get_token(&self, region: TenantRegion) -> Result<AuthToken, PartnerCenterError> {
        let credentials = self.regions.get(region);
        if let Some(key) = credentials.missing_key() {
            return Err(PartnerCenterError::Configuration { region, key });
        }

        if let Some(token) = self.cached(region).filter(|t| t.is_valid_at(Utc::now())) {
            debug!(region = %region, "Token cache hit");
            return Ok(token);
        }

        let token = self.exchange_refresh_token(region, credentials).await?;
        self.tokens.insert(region, token.clone());
        Ok(token)
    }

    /// Currently cached token, expired or not
    pub fn cached(&self, region: TenantRegion) -> Option<AuthToken> {
        self.tokens.get(&region).map(|entry| entry.value().clone())
    }

    async fn exchange_refresh_token(
        &self,
        region: TenantRegion,
        credentials: &RegionCredentials,
    ) -> Result<AuthToken, PartnerCenterError> {
        let url = format!("{}/{}/oauth2/token", self.login_url, credentials.tenant_id);
        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("scope", self.scope.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
            ("client_secret", credentials.app_secret.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| PartnerCenterError::Authentication {
                region,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(region = %region, status = status.as_u16(), "Token exchange rejected");
            return Err(PartnerCenterError::Authentication {
                region,
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let body: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| PartnerCenterError::Authentication {
                    region,
                    reason: format!("invalid token response: {}", e),
                })?;

        let expires_at =
            body.expires_on
                .to_datetime()
                .ok_or_else(|| PartnerCenterError::Authentication {
                    region,
                    reason: format!("invalid expires_on: {:?}", body.expires_on),
                })?;

        info!(region = %region, expires_at = %expires_at, "Partner Center token refreshed");

        Ok(AuthToken {
            token: body.access_token,
            expires_at,
        })
    }
}
