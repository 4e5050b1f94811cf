//! Transfer domain types
//!
//! Partner Center speaks in strings and integers (`"Complete"`, `1`,
//! `"complete-transfer"`). Each of those is modelled as a closed enum with a
//! single canonical parse/format pair so the rest of the crate never compares
//! raw strings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::error::RelayError;

// ============================================================================
// Tenant Region
// ============================================================================

/// Tenant / data-residency zone with isolated Partner Center credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub enum TenantRegion {
    /// United States
    US,
    /// Canada
    CA,
    /// Europe
    EU,
}

impl TenantRegion {
    pub const ALL: [TenantRegion; 3] = [TenantRegion::US, TenantRegion::CA, TenantRegion::EU];

    pub fn as_str(&self) -> &'static str {
        match self {
            TenantRegion::US => "US",
            TenantRegion::CA => "CA",
            TenantRegion::EU => "EU",
        }
    }

    /// Route served for this region's webhook, e.g. `/transfer-webhook-us`
    pub fn webhook_path(&self) -> String {
        format!("/transfer-webhook-{}", self.as_str().to_lowercase())
    }
}

impl fmt::Display for TenantRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TenantRegion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(TenantRegion::US),
            "CA" => Ok(TenantRegion::CA),
            "EU" => Ok(TenantRegion::EU),
            other => Err(format!("unknown tenant region '{}', expected US, CA or EU", other)),
        }
    }
}

impl TryFrom<String> for TenantRegion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TenantRegion> for String {
    fn from(region: TenantRegion) -> Self {
        region.as_str().to_string()
    }
}

// ============================================================================
// Transfer Status
// ============================================================================

/// Partner Center transfer status
///
/// Only `Complete` and `Expired` are terminal for the relay; anything the
/// upstream invents later lands in `Other` and is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransferStatus {
    Active,
    Pending,
    Complete,
    Expired,
    Other(String),
}

impl TransferStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransferStatus::Active => "Active",
            TransferStatus::Pending => "Pending",
            TransferStatus::Complete => "Complete",
            TransferStatus::Expired => "Expired",
            TransferStatus::Other(raw) => raw,
        }
    }

    /// Complete or Expired
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Complete | TransferStatus::Expired)
    }
}

impl From<&str> for TransferStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => TransferStatus::Active,
            "pending" => TransferStatus::Pending,
            "complete" => TransferStatus::Complete,
            "expired" => TransferStatus::Expired,
            _ => TransferStatus::Other(raw.to_string()),
        }
    }
}

impl From<String> for TransferStatus {
    fn from(raw: String) -> Self {
        TransferStatus::from(raw.as_str())
    }
}

impl From<TransferStatus> for String {
    fn from(status: TransferStatus) -> Self {
        match status {
            TransferStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Transfer Direction
// ============================================================================

/// Direction relative to the partner organization receiving the webhook
///
/// Serialized as the integer Partner Center uses (1 = incoming, 2 = outgoing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum TransferDirection {
    IncomingTransfer,
    OutgoingTransfer,
    Unknown(i32),
}

impl TransferDirection {
    pub fn id(&self) -> i32 {
        match self {
            TransferDirection::IncomingTransfer => 1,
            TransferDirection::OutgoingTransfer => 2,
            TransferDirection::Unknown(id) => *id,
        }
    }
}

impl From<i32> for TransferDirection {
    fn from(id: i32) -> Self {
        match id {
            1 => TransferDirection::IncomingTransfer,
            2 => TransferDirection::OutgoingTransfer,
            other => TransferDirection::Unknown(other),
        }
    }
}

impl From<TransferDirection> for i32 {
    fn from(direction: TransferDirection) -> Self {
        direction.id()
    }
}

impl Default for TransferDirection {
    fn default() -> Self {
        TransferDirection::Unknown(0)
    }
}

/// `transferType` value for new-commerce transfers
pub const TRANSFER_TYPE_NEW_COMMERCE: i32 = 3;

// ============================================================================
// Transfer Event Kind
// ============================================================================

/// Webhook event name sent by Partner Center
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEventKind {
    CreateTransfer,
    UpdateTransfer,
    CompleteTransfer,
    FailTransfer,
    Other(String),
}

impl TransferEventKind {
    pub fn as_str(&self) -> &str {
        match self {
            TransferEventKind::CreateTransfer => "create-transfer",
            TransferEventKind::UpdateTransfer => "update-transfer",
            TransferEventKind::CompleteTransfer => "complete-transfer",
            TransferEventKind::FailTransfer => "fail-transfer",
            TransferEventKind::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "create-transfer" => TransferEventKind::CreateTransfer,
            "update-transfer" => TransferEventKind::UpdateTransfer,
            "complete-transfer" => TransferEventKind::CompleteTransfer,
            "fail-transfer" => TransferEventKind::FailTransfer,
            _ => TransferEventKind::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for TransferEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Transfer Record (upstream resource)
// ============================================================================

/// Transfer resource as returned by `GET /v1/customers/{id}/transfers/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub id: String,
    pub status: TransferStatus,
    #[serde(default)]
    pub transfer_type: i32,
    #[serde(default)]
    pub customer_email_id: String,
    pub created_time: DateTime<Utc>,
    pub last_modified_time: DateTime<Utc>,
    #[serde(default)]
    pub completed_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_tenant_id: String,
    #[serde(default)]
    pub partner_tenant_id: String,
    #[serde(default)]
    pub source_partner_name: String,
    #[serde(default)]
    pub source_partner_tenant_id: String,
    #[serde(default)]
    pub target_partner_name: String,
    #[serde(default)]
    pub target_partner_tenant_id: String,
    #[serde(default)]
    pub target_partner_email_id: String,
    #[serde(default)]
    pub transfer_direction: TransferDirection,
    #[serde(default)]
    pub ignore_eligibility_check: bool,
    #[serde(default)]
    pub last_modified_user: String,
}

// ============================================================================
// Transfer Event (inbound webhook body)
// ============================================================================

/// Inbound Partner Center webhook notification
///
/// Partner Center posts PascalCase keys; camelCase is accepted as well.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    /// Event name, e.g. `complete-transfer`
    #[serde(alias = "EventName")]
    #[validate(length(min = 1, message = "eventName must not be empty"))]
    #[schema(example = "complete-transfer")]
    pub event_name: String,
    #[serde(default, alias = "ResourceUri")]
    pub resource_uri: Option<String>,
    #[serde(default, alias = "ResourceName")]
    pub resource_name: Option<String>,
    /// Reference to the transfer; customer and transfer ids are encoded in it
    #[serde(alias = "AuditUri")]
    #[schema(example = "https://api.partnercenter.microsoft.com/v1/auditrecords/transfer_6b1a1d34-0f53-4c4a-9d8e-b1e7e2d0a2f1_a9c6e1f0-3e3c-4b8e-8d0b-1f2e3d4c5b6a")]
    pub audit_uri: String,
    #[serde(default, alias = "ResourceChangeUtcDate")]
    pub resource_change_utc_date: Option<DateTime<Utc>>,
}

impl TransferEvent {
    pub fn kind(&self) -> TransferEventKind {
        TransferEventKind::parse(&self.event_name)
    }
}

// ============================================================================
// Transfer Reference
// ============================================================================

/// Customer + transfer identifiers extracted from a webhook's audit URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReference {
    pub customer_id: String,
    pub transfer_id: String,
}

impl TransferReference {
    /// Split on `_`; the 2nd segment is the customer id, the 3rd the transfer id.
    ///
    /// Ids end up as URL path segments, so only ASCII alphanumerics and `-`
    /// are accepted.
    pub fn parse(uri: &str) -> Result<Self, RelayError> {
        let mut segments = uri.split('_').skip(1);
        let customer_id = segments.next().map(str::trim).unwrap_or_default();
        let transfer_id = segments.next().map(str::trim).unwrap_or_default();

        if !is_plain_id(customer_id) || !is_plain_id(transfer_id) {
            return Err(RelayError::UpstreamFetch(format!(
                "malformed transfer reference: '{}'",
                uri
            )));
        }

        Ok(Self {
            customer_id: customer_id.to_string(),
            transfer_id: transfer_id.to_string(),
        })
    }
}

fn is_plain_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
