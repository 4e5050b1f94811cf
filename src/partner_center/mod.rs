//! Microsoft Partner Center integration
//!
//! - [`auth`] - per-region OAuth token cache (refresh-token grant)
//! - [`client`] - transfer lookup and creation

pub mod auth;
pub mod client;
pub mod error;

pub use auth::{AuthToken, TokenCache};
pub use client::{NewTransfer, PartnerCenterClient};
pub use error::PartnerCenterError;
