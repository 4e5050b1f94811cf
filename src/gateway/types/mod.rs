//! Gateway DTOs
//!
//! - `response`: envelope, error codes, `ApiError`
//! - `request`: request bodies and the validating extractor

pub mod request;
pub mod response;

pub use request::{CreateTransferRequest, CreateTransferResponse, ValidatedJson, WebhookAck};
pub use response::{ApiError, ApiResponse, ApiResult, error_codes, ok};
