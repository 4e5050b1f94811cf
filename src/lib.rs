//! NCE Transfer Webhooks
//!
//! Relays Partner Center new-commerce subscription transfer events to the
//! billing system.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`partner_center`] - OAuth token cache and transfer REST client
//! - [`transfer`] - Domain types, dispatch policy, relay pipeline, adapters
//! - [`gateway`] - axum HTTP surface

pub mod config;
pub mod gateway;
pub mod logging;
pub mod partner_center;
pub mod transfer;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use transfer::{DispatchDecision, RejectReason, RelayError, TenantRegion, TransferRelay};
