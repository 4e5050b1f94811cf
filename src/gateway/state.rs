use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::AppConfig;
use crate::partner_center::{PartnerCenterClient, TokenCache};
use crate::transfer::TransferRelay;
use crate::transfer::adapters::billing::{DisabledImportService, HttpForwarder, HttpImportService};
use crate::transfer::adapters::email::{LogNotifier, SendGridNotifier};
use crate::transfer::adapters::{ImportService, Notifier};

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    /// Webhook pipeline
    pub relay: Arc<TransferRelay>,
    /// Direct Partner Center access for create-transfer
    pub partner_center: Arc<PartnerCenterClient>,
}

impl AppState {
    pub fn new(relay: Arc<TransferRelay>) -> Self {
        let partner_center = relay.partner_center().clone();
        Self {
            relay,
            partner_center,
        }
    }

    /// Wire every collaborator from configuration.
    ///
    /// One `reqwest::Client` (and its connection pool) is shared by all
    /// outbound calls.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;

        let tokens = Arc::new(TokenCache::new(http.clone(), &config.partner_center));
        let partner_center = Arc::new(PartnerCenterClient::new(
            http.clone(),
            &config.partner_center.base_url,
            tokens,
        ));

        let forwarder = Arc::new(HttpForwarder::new(
            http.clone(),
            config.billing.forward_url.clone(),
        ));

        let importer: Arc<dyn ImportService> = match &config.billing.import_url {
            Some(url) => Arc::new(HttpImportService::new(
                http.clone(),
                url.clone(),
                config.billing.import_api_key.clone(),
            )),
            None => Arc::new(DisabledImportService),
        };

        let notifier: Arc<dyn Notifier> = match &config.email {
            Some(email) => Arc::new(SendGridNotifier::new(http, email.clone())),
            None => Arc::new(LogNotifier),
        };

        info!(
            importer = importer.name(),
            notifier = notifier.name(),
            "Transfer relay wired"
        );

        let relay = Arc::new(TransferRelay::new(
            partner_center,
            forwarder,
            importer,
            notifier,
        ));
        Ok(Self::new(relay))
    }
}
