//! Transfer notification emails (SendGrid v3 `mail/send`)

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::Notifier;
use crate::config::EmailConfig;
use crate::transfer::types::{TransferEvent, TransferRecord, TransferStatus};

/// Subject line naming the status the transfer reached
pub fn subject(transfer: &TransferRecord) -> String {
    match &transfer.status {
        TransferStatus::Complete => "NCE Transfer Completed".to_string(),
        TransferStatus::Expired => "NCE Transfer Expired".to_string(),
        other => format!("NCE Transfer {}", other.as_str()),
    }
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: String,
}

#[derive(Serialize)]
struct MailSend<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: String,
    content: [Content; 1],
}

pub struct SendGridNotifier {
    http: reqwest::Client,
    config: EmailConfig,
}

impl SendGridNotifier {
    pub fn new(http: reqwest::Client, config: EmailConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    fn name(&self) -> &'static str {
        "sendgrid"
    }

    async fn notify(
        &self,
        transfer: &TransferRecord,
        event: &TransferEvent,
    ) -> anyhow::Result<()> {
        let body = MailSend {
            personalizations: [Personalization {
                to: [Address {
                    email: &self.config.to_email,
                    name: &self.config.to_name,
                }],
            }],
            from: Address {
                email: &self.config.from_email,
                name: &self.config.from_name,
            },
            subject: subject(transfer),
            content: [Content {
                content_type: "text/html",
                value: render_html(transfer, event),
            }],
        };

        let url = format!("{}/v3/mail/send", self.config.api_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("SendGrid request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("SendGrid returned HTTP {}", status.as_u16());
        }
        Ok(())
    }
}

/// Used when no email section is configured
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(
        &self,
        transfer: &TransferRecord,
        event: &TransferEvent,
    ) -> anyhow::Result<()> {
        info!(
            transfer_id = %transfer.id,
            event = %event.event_name,
            customer = %transfer.customer_name,
            "Email disabled, transfer notification logged only"
        );
        Ok(())
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_html(transfer: &TransferRecord, event: &TransferEvent) -> String {
    let completed = transfer
        .completed_time
        .or(event.resource_change_utc_date)
        .map(|t| t.format("%Y-%m-%d %H:%M:%SZ").to_string())
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        r#"<html>
<body>
    <p>Team,</p>
    <p>The NCE transfer below has reached status <strong>{status}</strong>.</p>
    <ul style='list-style-type:none; padding: 0;'>
        <li><strong>Transfer ID:</strong> {id}</li>
        <li><strong>Event:</strong> {event}</li>
        <li><strong>Customer:</strong> {customer} ({customer_tenant})</li>
        <li><strong>Source Partner:</strong> {source} ({source_tenant})</li>
        <li><strong>Target Partner:</strong> {target} ({target_tenant})</li>
        <li><strong>Date of Change (UTC):</strong> {completed}</li>
    </ul>
</body>
</html>"#,
        status = escape(transfer.status.as_str()),
        id = escape(&transfer.id),
        event = escape(&event.event_name),
        customer = escape(&transfer.customer_name),
        customer_tenant = escape(&transfer.customer_tenant_id),
        source = escape(&transfer.source_partner_name),
        source_tenant = escape(&transfer.source_partner_tenant_id),
        target = escape(&transfer.target_partner_name),
        target_tenant = escape(&transfer.target_partner_tenant_id),
        completed = completed,
    )
}
