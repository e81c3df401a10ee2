use async_trait::async_trait;

use crate::config::WebhookConfig;
use crate::models::ReceptionEvent;

use super::{Notifier, NotifyError};

const MAX_ATTEMPTS: u32 = 3;

/// Delivers reception events to the Power Automate flow. Transient upstream
/// trouble gets a couple of retries; anything else fails immediately. The
/// caller decides what a failure means (for the pipeline: a warning, never
/// a rollback).
pub struct WebhookNotifier {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .expect("Failed to build reqwest client"),
            config,
        }
    }

    fn is_transient(status: reqwest::StatusCode) -> bool {
        matches!(status.as_u16(), 429 | 502 | 503 | 504)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, event: &ReceptionEvent) -> Result<(), NotifyError> {
        let mut last_err = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            match self.client.post(&self.config.url).json(event).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(());
                    }
                    let body = resp
                        .text()
                        .await
                        .unwrap_or_default()
                        .chars()
                        .take(300)
                        .collect::<String>();
                    last_err = format!("webhook returned HTTP {status}: {body}");
                    if !Self::is_transient(status) {
                        return Err(NotifyError::from(last_err));
                    }
                }
                Err(e) => {
                    last_err = format!("webhook request failed: {e}");
                }
            }

            if attempt < MAX_ATTEMPTS {
                let backoff = std::time::Duration::from_millis(500 * 2u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }
        }

        Err(NotifyError::from(format!(
            "failed after {MAX_ATTEMPTS} attempts: {last_err}"
        )))
    }
}
