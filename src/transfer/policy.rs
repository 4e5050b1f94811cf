//! Transfer Dispatch Policy
//!
//! Decides whether a fetched transfer is forwarded downstream, forwarded with
//! an internal import, or rejected. Pure and safe to evaluate repeatedly for
//! the same event, since Partner Center redelivers webhooks.
//!
//! Rules, first match wins:
//!
//! ```text
//! direction != Incoming                      → Reject(NotIncoming)
//! status ∉ {Complete, Expired}               → Reject(UnsupportedStatus)
//! status == Complete, event != complete      → Reject(CompletionPending)
//! Complete + Incoming + complete-transfer    → TriggerImport
//! otherwise                                  → Forward
//! ```

use std::fmt;

use super::types::{TransferDirection, TransferEventKind, TransferRecord, TransferStatus};

/// Why a transfer was not forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotIncoming,
    UnsupportedStatus,
    /// Transfer already reads Complete but its completion webhook has not arrived
    CompletionPending,
}

impl RejectReason {
    /// User-facing reason string
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotIncoming => "not an incoming transfer",
            RejectReason::UnsupportedStatus => "status is neither Complete nor Expired",
            RejectReason::CompletionPending => {
                "status is Complete but the completing event has not yet arrived"
            }
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchDecision {
    /// Send to the downstream billing system
    Forward,
    /// Run the internal import, then forward whatever its outcome
    TriggerImport,
    Reject(RejectReason),
}

impl DispatchDecision {
    #[inline]
    pub fn forwards(&self) -> bool {
        !matches!(self, DispatchDecision::Reject(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchDecision::Forward => "FORWARD",
            DispatchDecision::TriggerImport => "TRIGGER_IMPORT",
            DispatchDecision::Reject(_) => "REJECT",
        }
    }
}

impl fmt::Display for DispatchDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate a transfer against the event that triggered its lookup
pub fn evaluate(transfer: &TransferRecord, event: &TransferEventKind) -> DispatchDecision {
    if transfer.transfer_direction != TransferDirection::IncomingTransfer {
        return DispatchDecision::Reject(RejectReason::NotIncoming);
    }

    if !transfer.status.is_terminal() {
        return DispatchDecision::Reject(RejectReason::UnsupportedStatus);
    }

    let is_completion_event = *event == TransferEventKind::CompleteTransfer;

    if transfer.status == TransferStatus::Complete && !is_completion_event {
        return DispatchDecision::Reject(RejectReason::CompletionPending);
    }

    if transfer.status == TransferStatus::Complete
        && transfer.transfer_direction == TransferDirection::IncomingTransfer
        && is_completion_event
    {
        DispatchDecision::TriggerImport
    } else {
        DispatchDecision::Forward
    }
}
