//! Transfer Relay
//!
//! Drives one inbound webhook through the pipeline:
//!
//! ```text
//! audit URI ─▶ token ─▶ GET transfer ─▶ policy ─┬─▶ Reject (409)
//!                                               └─▶ [import] ─▶ notify ─▶ forward
//! ```
//!
//! Import and notification outcomes are logged only; forwarding proceeds
//! regardless. No step is retried, Partner Center redelivery covers that.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::adapters::{ImportService, Notifier, TransferForwarder};
use super::error::RelayError;
use super::policy::{self, DispatchDecision};
use super::types::{TenantRegion, TransferEvent, TransferReference};
use crate::partner_center::PartnerCenterClient;

/// What happened to an accepted event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub transfer_id: String,
    pub decision: DispatchDecision,
    /// `None` when no import was attempted
    pub import_succeeded: Option<bool>,
}

pub struct TransferRelay {
    partner_center: Arc<PartnerCenterClient>,
    forwarder: Arc<dyn TransferForwarder>,
    importer: Arc<dyn ImportService>,
    notifier: Arc<dyn Notifier>,
}

impl TransferRelay {
    pub fn new(
        partner_center: Arc<PartnerCenterClient>,
        forwarder: Arc<dyn TransferForwarder>,
        importer: Arc<dyn ImportService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            partner_center,
            forwarder,
            importer,
            notifier,
        }
    }

    pub fn partner_center(&self) -> &Arc<PartnerCenterClient> {
        &self.partner_center
    }

    /// Process one webhook event for `region`
    pub async fn relay(
        &self,
        region: TenantRegion,
        event: &TransferEvent,
    ) -> Result<RelayOutcome, RelayError> {
        let kind = event.kind();
        let reference = TransferReference::parse(&event.audit_uri)?;

        let transfer = self
            .partner_center
            .get_transfer(region, &reference)
            .await?;

        let decision = policy::evaluate(&transfer, &kind);
        info!(
            region = %region,
            transfer_id = %transfer.id,
            status = %transfer.status,
            event = %kind,
            decision = %decision,
            "Transfer evaluated"
        );

        if let DispatchDecision::Reject(reason) = decision {
            return Err(RelayError::PolicyRejection(reason));
        }

        let import_succeeded = if decision == DispatchDecision::TriggerImport {
            Some(self.run_import(&transfer.customer_tenant_id, &transfer.id).await)
        } else {
            None
        };

        if let Err(e) = self.notifier.notify(&transfer, event).await {
            warn!(
                transfer_id = %transfer.id,
                notifier = self.notifier.name(),
                "Notification failed: {:#}",
                e
            );
        }

        self.forwarder.forward(&transfer).await.inspect_err(|e| {
            error!(
                transfer_id = %transfer.id,
                forwarder = self.forwarder.name(),
                "Forward failed: {}",
                e
            )
        })?;

        info!(region = %region, transfer_id = %transfer.id, "Transfer relayed");

        Ok(RelayOutcome {
            transfer_id: transfer.id,
            decision,
            import_succeeded,
        })
    }

    /// Import is best-effort: the result is logged and returned, never raised
    async fn run_import(&self, organization_id: &str, transfer_id: &str) -> bool {
        match self.importer.import(organization_id).await {
            Ok(outcome) if outcome.is_success => {
                info!(transfer_id, organization_id, "Import completed");
                true
            }
            Ok(outcome) => {
                warn!(
                    transfer_id,
                    organization_id,
                    importer = self.importer.name(),
                    "Import reported failure: {}",
                    outcome.error.as_deref().unwrap_or("no detail")
                );
                false
            }
            Err(e) => {
                warn!(
                    transfer_id,
                    organization_id,
                    importer = self.importer.name(),
                    "Import call failed: {}",
                    e
                );
                false
            }
        }
    }
}
