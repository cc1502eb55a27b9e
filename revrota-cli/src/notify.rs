use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

/// Chat webhook notifier.
///
/// Delivery is best-effort: an unconfigured webhook is a no-op and a failed
/// dispatch is logged, never retried and never fatal to the run.
pub struct Notifier {
    client: Client,
    webhook_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

impl Notifier {
    pub fn new(client: Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }

    pub async fn send(&self, message: &str) {
        let Some(url) = &self.webhook_url else {
            debug!("No webhook configured, skipping notification");
            return;
        };

        let result = self
            .client
            .post(url)
            .json(&WebhookPayload { text: message })
            .send()
            .await;

        match result {
            Ok(response) if !response.status().is_success() => {
                warn!(
                    "Webhook dispatch failed: {} - {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Webhook dispatch failed: {}", e);
            }
        }
    }
}
