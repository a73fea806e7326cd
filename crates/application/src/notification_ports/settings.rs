use async_trait::async_trait;
use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::WebhookSettings;

/// Repository port for per-tenant webhook settings.
#[async_trait]
pub trait WebhookSettingsRepository: Send + Sync {
    /// Returns stored settings, if any.
    async fn find_settings(&self, tenant_id: TenantId) -> AppResult<Option<WebhookSettings>>;

    /// Replaces the tenant's settings.
    async fn save_settings(&self, tenant_id: TenantId, settings: WebhookSettings)
    -> AppResult<()>;
}
