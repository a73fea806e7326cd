//! Outbound webhook calls with per-attempt timeout and linear backoff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use ticketdesk_application::{DeliveryMode, DeliveryReceipt, WebhookDelivery};
use ticketdesk_domain::WebhookMessage;
use tracing::{debug, warn};

/// HTTP implementation of the webhook delivery port.
///
/// Creates are `POST {url}?wait=true` so the endpoint returns the created
/// message; edits are `PATCH {url}/messages/{message_id}`.
pub struct HttpWebhookDeliveryClient {
    http_client: reqwest::Client,
    timeout: Duration,
    max_attempts: u8,
    retry_delay_ms: u64,
}

impl HttpWebhookDeliveryClient {
    /// Creates a new webhook delivery client.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        timeout: Duration,
        max_attempts: u8,
        retry_delay_ms: u64,
    ) -> Self {
        Self {
            http_client,
            timeout,
            max_attempts: max_attempts.max(1),
            retry_delay_ms,
        }
    }

    fn request_url(url: &str, mode: &DeliveryMode) -> Result<Url, String> {
        let mut url = Url::parse(url.trim()).map_err(|error| format!("invalid url: {error}"))?;

        match mode {
            DeliveryMode::Create => {
                url.query_pairs_mut().append_pair("wait", "true");
            }
            DeliveryMode::Edit { message_id } => {
                url.path_segments_mut()
                    .map_err(|()| "url cannot carry a path".to_owned())?
                    .pop_if_empty()
                    .push("messages")
                    .push(message_id);
            }
        }

        Ok(url)
    }

    async fn send_once(
        &self,
        url: &Url,
        message: &WebhookMessage,
        mode: &DeliveryMode,
    ) -> Result<Option<String>, String> {
        let builder = match mode {
            DeliveryMode::Create => self.http_client.post(url.clone()),
            DeliveryMode::Edit { .. } => self.http_client.patch(url.clone()),
        };

        let response = builder
            .timeout(self.timeout)
            .json(message)
            .send()
            .await
            .map_err(|error| format!("transport error: {error}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP status {status}"));
        }

        if matches!(mode, DeliveryMode::Edit { .. }) {
            return Ok(None);
        }

        let message_id = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("id").and_then(Value::as_str).map(str::to_owned));

        Ok(message_id)
    }
}

#[async_trait]
impl WebhookDelivery for HttpWebhookDeliveryClient {
    async fn deliver(
        &self,
        url: &str,
        message: &WebhookMessage,
        mode: DeliveryMode,
    ) -> DeliveryReceipt {
        let request_url = match Self::request_url(url, &mode) {
            Ok(request_url) => request_url,
            Err(error) => {
                warn!(error = %error, "webhook delivery skipped");
                return DeliveryReceipt::Failed;
            }
        };

        let mut attempt = 0_u8;
        let mut last_error = String::new();

        while attempt < self.max_attempts {
            attempt = attempt.saturating_add(1);

            match self.send_once(&request_url, message, &mode).await {
                Ok(message_id) => {
                    debug!(attempt, "webhook delivered");
                    return DeliveryReceipt::Delivered { message_id };
                }
                Err(error) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "webhook delivery attempt failed"
                    );
                    last_error = error;
                }
            }

            if attempt < self.max_attempts {
                let delay = self.retry_delay_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        warn!(
            attempts = attempt,
            error = %last_error,
            "webhook delivery exhausted retries"
        );
        DeliveryReceipt::Failed
    }
}
