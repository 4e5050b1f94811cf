//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{CreateTransferRequest, CreateTransferResponse, WebhookAck};
use crate::transfer::{TenantRegion, TransferEvent};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NCE Transfer Webhooks API",
        version = "1.0.0",
        description = "Relays Partner Center new-commerce transfer events to the billing system."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::webhook::transfer_webhook,
        crate::gateway::handlers::transfer::create_transfer,
    ),
    components(
        schemas(
            HealthResponse,
            TenantRegion,
            TransferEvent,
            WebhookAck,
            CreateTransferRequest,
            CreateTransferResponse,
        )
    ),
    tags(
        (name = "Webhook", description = "Partner Center transfer notifications"),
        (name = "Transfer", description = "Transfer creation"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
