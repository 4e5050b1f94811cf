//! Relay Adapters
//!
//! Side-effect seams called by the relay once a transfer passes the dispatch
//! policy: the downstream forwarder, the Cumulus import RPC and the email
//! notifier. Partner Center redelivers webhooks, so every adapter may see the
//! same transfer more than once.

pub mod billing;
pub mod email;

pub use billing::{DisabledImportService, HttpForwarder, HttpImportService};
pub use email::{LogNotifier, SendGridNotifier};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RelayError;
use super::types::{TransferEvent, TransferRecord};

/// Reply of the internal import RPC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub is_success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ImportOutcome {
    pub fn success() -> Self {
        Self {
            is_success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            is_success: false,
            error: Some(error.into()),
        }
    }
}

/// Delivers an accepted transfer to the downstream billing endpoint
#[async_trait]
pub trait TransferForwarder: Send + Sync {
    /// Get adapter name for logging
    fn name(&self) -> &'static str;

    /// Any 2xx is success; everything else is `DownstreamForward`
    async fn forward(&self, transfer: &TransferRecord) -> Result<(), RelayError>;
}

/// Internal import operation for a newly transferred organization
#[async_trait]
pub trait ImportService: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Err` means the RPC itself failed; a reachable service reporting a
    /// failed import returns `Ok` with `is_success == false`.
    async fn import(&self, organization_id: &str) -> Result<ImportOutcome, RelayError>;
}

/// Email notification for an accepted transfer
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn notify(&self, transfer: &TransferRecord, event: &TransferEvent)
    -> anyhow::Result<()>;
}
