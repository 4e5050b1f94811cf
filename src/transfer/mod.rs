//! Transfer relay
//!
//! Turns Partner Center transfer webhooks into downstream billing calls.
//!
//! # Pipeline
//!
//! ```text
//! webhook(region) → token(region) → GET transfer → policy → import? → notify → forward
//! ```
//!
//! # Invariants
//!
//! 1. **Policy-gated forwarding**: a transfer reaches the billing system only
//!    when [`policy::evaluate`] does not reject it
//! 2. **Best-effort side channels**: import and email failures are logged and
//!    never change the response
//! 3. **Redelivery-safe**: the policy is pure, so duplicate webhooks are
//!    evaluated the same way every time

pub mod adapters;
pub mod error;
pub mod policy;
pub mod relay;
pub mod types;

// Re-exports for convenience
pub use error::RelayError;
pub use policy::{DispatchDecision, RejectReason};
pub use relay::{RelayOutcome, TransferRelay};
pub use types::{
    TRANSFER_TYPE_NEW_COMMERCE, TenantRegion, TransferDirection, TransferEvent,
    TransferEventKind, TransferRecord, TransferReference, TransferStatus,
};
