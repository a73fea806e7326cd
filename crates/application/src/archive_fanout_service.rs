use std::sync::Arc;

use chrono::Utc;
use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::{LogChannel, Ticket, archive_message, archive_status_line};
use tracing::{info, warn};

use crate::notification_ports::{
    DeliveryMode, LogChannelSender, WebhookDelivery, WebhookSettingsRepository,
};

/// Where an archive notification ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanoutOutcome {
    /// The ticket was already marked as sent; nothing was delivered.
    AlreadySent,
    /// An archive endpoint accepted the notification.
    Delivered {
        /// Url of the endpoint that accepted it.
        endpoint_url: String,
    },
    /// Every endpoint failed; the status line reached the log channel.
    LoggedToChannel,
    /// Every endpoint failed; the private logging endpoint accepted the payload.
    LoggedToPrivateEndpoint,
    /// Nothing accepted the notification.
    Undelivered,
}

/// Fallback destinations used when no archive endpoint succeeds.
#[derive(Clone, Default)]
pub struct ArchiveFallbacks {
    /// Sender for plain log channel lines.
    pub log_channel_sender: Option<Arc<dyn LogChannelSender>>,
    /// Channel names that never receive fallback lines.
    pub log_channel_denylist: Vec<String>,
    /// Private logging webhook.
    pub private_log_url: Option<String>,
}

/// Sends the one-shot archive notification to every configured endpoint.
#[derive(Clone)]
pub struct ArchiveFanoutService {
    settings_repository: Arc<dyn WebhookSettingsRepository>,
    delivery: Arc<dyn WebhookDelivery>,
    fallbacks: ArchiveFallbacks,
    username: Option<String>,
}

impl ArchiveFanoutService {
    /// Creates a fanout service without fallbacks.
    #[must_use]
    pub fn new(
        settings_repository: Arc<dyn WebhookSettingsRepository>,
        delivery: Arc<dyn WebhookDelivery>,
    ) -> Self {
        Self {
            settings_repository,
            delivery,
            fallbacks: ArchiveFallbacks::default(),
            username: None,
        }
    }

    /// Adds fallback destinations.
    #[must_use]
    pub fn with_fallbacks(mut self, fallbacks: ArchiveFallbacks) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// Sets the sender name placed on archive messages.
    #[must_use]
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    /// Delivers the archive notification for `ticket`.
    ///
    /// Endpoints are tried in order and the first success sets
    /// `ticket.webhook_sent`, which makes later calls no-ops. The caller
    /// persists the flag.
    pub async fn fanout(
        &self,
        tenant_id: TenantId,
        ticket: &mut Ticket,
        reason: &str,
    ) -> AppResult<FanoutOutcome> {
        if ticket.webhook_sent {
            return Ok(FanoutOutcome::AlreadySent);
        }

        let settings = self
            .settings_repository
            .find_settings(tenant_id)
            .await?
            .unwrap_or_default();
        let message = archive_message(ticket, reason, self.username.as_deref(), Utc::now());

        for endpoint in &settings.archive_endpoints {
            let receipt = self
                .delivery
                .deliver(endpoint.url.as_str(), &message, DeliveryMode::Create)
                .await;

            if receipt.is_delivered() {
                ticket.webhook_sent = true;
                info!(
                    tenant_id = %tenant_id,
                    ticket_id = %ticket.id,
                    endpoint = endpoint.name.as_str(),
                    "archive notification delivered"
                );
                return Ok(FanoutOutcome::Delivered {
                    endpoint_url: endpoint.url.clone(),
                });
            }

            warn!(
                tenant_id = %tenant_id,
                ticket_id = %ticket.id,
                endpoint = endpoint.name.as_str(),
                "archive endpoint failed"
            );
        }

        if let Some(channel) = &settings.log_channel
            && self.post_to_log_channel(tenant_id, channel, ticket, reason).await
        {
            return Ok(FanoutOutcome::LoggedToChannel);
        }

        if let Some(url) = &self.fallbacks.private_log_url {
            let receipt = self
                .delivery
                .deliver(url.as_str(), &message, DeliveryMode::Create)
                .await;
            if receipt.is_delivered() {
                info!(
                    tenant_id = %tenant_id,
                    ticket_id = %ticket.id,
                    "archive notification sent to private log endpoint"
                );
                return Ok(FanoutOutcome::LoggedToPrivateEndpoint);
            }

            warn!(
                tenant_id = %tenant_id,
                ticket_id = %ticket.id,
                "private log endpoint failed"
            );
        }

        warn!(
            tenant_id = %tenant_id,
            ticket_id = %ticket.id,
            "archive notification undelivered"
        );
        Ok(FanoutOutcome::Undelivered)
    }

    async fn post_to_log_channel(
        &self,
        tenant_id: TenantId,
        channel: &LogChannel,
        ticket: &Ticket,
        reason: &str,
    ) -> bool {
        let Some(sender) = &self.fallbacks.log_channel_sender else {
            return false;
        };

        if self.is_denylisted(channel.name.as_str()) {
            info!(
                tenant_id = %tenant_id,
                channel = channel.name.as_str(),
                "skipping denylisted log channel"
            );
            return false;
        }

        let line = archive_status_line(ticket, reason);
        match sender.post_status_line(tenant_id, channel, line.as_str()).await {
            Ok(()) => {
                info!(
                    tenant_id = %tenant_id,
                    ticket_id = %ticket.id,
                    channel = channel.name.as_str(),
                    "archive status posted to log channel"
                );
                true
            }
            Err(error) => {
                warn!(
                    tenant_id = %tenant_id,
                    channel = channel.name.as_str(),
                    error = %error,
                    "log channel fallback failed"
                );
                false
            }
        }
    }

    fn is_denylisted(&self, channel_name: &str) -> bool {
        let channel_name = channel_name.trim();
        self.fallbacks
            .log_channel_denylist
            .iter()
            .any(|denied| denied.trim().eq_ignore_ascii_case(channel_name))
    }
}
