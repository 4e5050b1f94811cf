//! HTTP gateway
//!
//! ```text
//! POST /transfer-webhook-{us,ca,eu}  → handlers::transfer_webhook(region)
//! POST /create-transfer              → handlers::create_transfer
//! GET  /health                       → handlers::health_check
//! GET  /docs                         → Swagger UI
//! ```

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::transfer::{TenantRegion, TransferEvent};
use state::AppState;
use types::ValidatedJson;

/// Build the complete router; split out of [`run_server`] so tests can drive it
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/create-transfer", post(handlers::create_transfer));

    // One handler, region bound per route
    for region in TenantRegion::ALL {
        app = app.route(
            &region.webhook_path(),
            post(
                move |state: State<Arc<AppState>>, body: ValidatedJson<TransferEvent>| {
                    handlers::transfer_webhook(region, state, body)
                },
            ),
        );
    }

    app.with_state(state)
        // Stateless, added after with_state
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start HTTP Gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {} (port already in use?)", addr, e))?;

    info!("Gateway listening on http://{}", addr);
    info!("API Docs: http://{}/docs", addr);
    for region in TenantRegion::ALL {
        info!(region = %region, "Webhook: POST {}", region.webhook_path());
    }

    axum::serve(listener, app).await?;
    Ok(())
}
