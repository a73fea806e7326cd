use std::sync::Arc;

use ticketdesk_application::{
    ArchiveFallbacks, DispatcherSettings, NotificationDispatcher, WebhookDelivery,
    WebhookSettingsRepository,
};
use ticketdesk_infrastructure::{ConsoleLogChannelSender, HttpWebhookDeliveryClient};

use crate::api_config::ApiConfig;

pub(super) fn build_webhook_delivery(config: &ApiConfig) -> Arc<dyn WebhookDelivery> {
    Arc::new(HttpWebhookDeliveryClient::new(
        reqwest::Client::new(),
        config.webhook_client.timeout,
        config.webhook_client.max_attempts,
        config.webhook_client.retry_delay_ms,
    ))
}

pub(super) fn build_notification_dispatcher(
    settings_repository: Arc<dyn WebhookSettingsRepository>,
    delivery: Arc<dyn WebhookDelivery>,
    config: &ApiConfig,
) -> NotificationDispatcher {
    NotificationDispatcher::new(
        settings_repository,
        delivery,
        DispatcherSettings {
            username: config.webhook_client.username.clone(),
            max_retries: config.dispatch.max_retries,
            base_delay: config.dispatch.base_delay,
            item_delay: config.dispatch.item_delay,
            idle_timeout: config.dispatch.idle_timeout,
        },
    )
}

pub(super) fn build_archive_fallbacks(config: &ApiConfig) -> ArchiveFallbacks {
    ArchiveFallbacks {
        log_channel_sender: Some(Arc::new(ConsoleLogChannelSender::new())),
        log_channel_denylist: config.log_channel_denylist.clone(),
        private_log_url: config.private_log_webhook_url.clone(),
    }
}
