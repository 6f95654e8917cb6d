use std::time::Duration;

use reqwest::Client;
use siren_core::error::{Result, SirenError};
use siren_core::model::alert::Alert;

/// Delivers rendered alerts to the chat webhook. Delivery is single-shot:
/// the response is logged, a non-2xx status is not retried here.
#[derive(Debug, Clone)]
pub struct Notifier {
    webhook_url: String,
    client: Client,
}

impl Notifier {
    pub fn new(webhook_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SirenError::Notify(format!("failed to build webhook client: {e}")))?;
        Ok(Self {
            webhook_url: webhook_url.to_string(),
            client,
        })
    }

    pub async fn send(&self, alert: &Alert) -> Result<()> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&alert.webhook_payload())
            .send()
            .await
            .map_err(|e| SirenError::Notify(format!("webhook POST failed: {e}")))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status.is_success() {
            tracing::info!(%status, %body, "webhook accepted alert");
        } else {
            tracing::warn!(%status, %body, "webhook rejected alert");
        }
        Ok(())
    }
}
