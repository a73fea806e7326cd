use std::sync::Arc;

use sqlx::PgPool;
use ticketdesk_application::{PolicyRepository, WebhookSettingsRepository};
use ticketdesk_infrastructure::{
    InMemoryPolicyRepository, InMemoryWebhookSettingsRepository, PostgresPolicyRepository,
    PostgresWebhookSettingsRepository,
};
use tracing::warn;

pub(super) struct RepositorySet {
    pub(super) policy_repository: Arc<dyn PolicyRepository>,
    pub(super) webhook_settings_repository: Arc<dyn WebhookSettingsRepository>,
}

pub(super) fn build_postgres_repository_set(pool: &PgPool) -> RepositorySet {
    RepositorySet {
        policy_repository: Arc::new(PostgresPolicyRepository::new(pool.clone())),
        webhook_settings_repository: Arc::new(PostgresWebhookSettingsRepository::new(
            pool.clone(),
        )),
    }
}

pub(super) fn build_in_memory_repository_set() -> RepositorySet {
    warn!("DATABASE_URL is not set; policies and webhook settings are kept in memory only");

    RepositorySet {
        policy_repository: Arc::new(InMemoryPolicyRepository::new()),
        webhook_settings_repository: Arc::new(InMemoryWebhookSettingsRepository::new()),
    }
}
