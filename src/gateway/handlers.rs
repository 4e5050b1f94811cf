//! HTTP handlers
//!
//! - `health`: liveness + build version
//! - `webhook`: one handler shared by every regional webhook route
//! - `transfer`: create-transfer

pub mod health;
pub mod transfer;
pub mod webhook;

pub use health::{HealthResponse, health_check};
pub use transfer::create_transfer;
pub use webhook::transfer_webhook;
