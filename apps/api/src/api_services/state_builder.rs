use std::sync::Arc;

use sqlx::PgPool;
use ticketdesk_application::{
    AccessControlService, ArchiveFanoutService, RateLimitService, StaffDetectionService,
    WebhookSettingsService,
};
use ticketdesk_infrastructure::InMemoryAccessDecisionCache;

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod notifications;
mod repositories;

pub fn build_app_state(pool: Option<PgPool>, config: &ApiConfig) -> AppState {
    let repositories = match pool {
        Some(pool) => repositories::build_postgres_repository_set(&pool),
        None => repositories::build_in_memory_repository_set(),
    };

    let access_control_service = AccessControlService::new(repositories.policy_repository)
        .with_decision_cache(
            Arc::new(InMemoryAccessDecisionCache::new()),
            config.access_cache_ttl_seconds,
        );

    let delivery = notifications::build_webhook_delivery(config);
    let notification_dispatcher = notifications::build_notification_dispatcher(
        repositories.webhook_settings_repository.clone(),
        delivery.clone(),
        config,
    );
    let archive_fanout_service = ArchiveFanoutService::new(
        repositories.webhook_settings_repository.clone(),
        delivery,
    )
    .with_fallbacks(notifications::build_archive_fallbacks(config))
    .with_username(config.webhook_client.username.clone());

    AppState {
        staff_detection_service: StaffDetectionService::new(access_control_service.clone()),
        access_control_service,
        rate_limit_service: RateLimitService::new(),
        webhook_settings_service: WebhookSettingsService::new(
            repositories.webhook_settings_repository,
        ),
        notification_dispatcher,
        archive_fanout_service,
        dashboard_token: config.dashboard_token.clone(),
    }
}
