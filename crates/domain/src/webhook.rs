use serde::{Deserialize, Serialize};
use ticketdesk_core::{AppError, AppResult};
use url::Url;

/// Endpoint receiving the one-message-per-ticket lifecycle updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTarget {
    /// Whether lifecycle updates are sent.
    pub enabled: bool,
    /// Webhook URL.
    pub url: String,
    /// Sender name shown on messages; blank falls back to the service default.
    #[serde(default)]
    pub name: String,
}

impl NotificationTarget {
    /// Returns the sender name for messages posted to this target.
    #[must_use]
    pub fn sender_name<'a>(&'a self, fallback: Option<&'a str>) -> Option<&'a str> {
        let name = self.name.trim();
        if name.is_empty() { fallback } else { Some(name) }
    }
}

/// One endpoint receiving the archive notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEndpoint {
    /// Webhook URL.
    pub url: String,
    /// Operator-facing label.
    #[serde(default)]
    pub name: String,
    /// Channel the webhook posts into, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

/// Chat channel used as the first archive fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogChannel {
    /// Channel identifier.
    pub id: String,
    /// Channel name, checked against the recursion denylist.
    pub name: String,
}

/// Per-tenant webhook configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookSettings {
    /// Lifecycle update target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<NotificationTarget>,
    /// Archive fanout endpoints, tried in order.
    pub archive_endpoints: Vec<ArchiveEndpoint>,
    /// Fallback log channel for archive notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_channel: Option<LogChannel>,
}

impl WebhookSettings {
    /// Returns the lifecycle target when it is enabled.
    #[must_use]
    pub fn active_lifecycle_target(&self) -> Option<&NotificationTarget> {
        self.lifecycle
            .as_ref()
            .filter(|target| target.enabled && !target.url.trim().is_empty())
    }

    /// Validates every configured URL.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(target) = &self.lifecycle {
            validate_webhook_url(target.url.as_str())?;
        }

        for endpoint in &self.archive_endpoints {
            validate_webhook_url(endpoint.url.as_str())?;
        }

        Ok(())
    }
}

/// Accepts absolute http(s) URLs with a host.
pub fn validate_webhook_url(value: &str) -> AppResult<()> {
    let url = Url::parse(value.trim())
        .map_err(|error| AppError::Validation(format!("invalid webhook url '{value}': {error}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "webhook url '{value}' must use http or https"
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::Validation(format!(
            "webhook url '{value}' must include a host"
        )));
    }

    Ok(())
}
