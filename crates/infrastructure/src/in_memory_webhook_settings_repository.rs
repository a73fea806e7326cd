use std::collections::HashMap;

use async_trait::async_trait;
use ticketdesk_application::WebhookSettingsRepository;
use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::WebhookSettings;
use tokio::sync::RwLock;

/// In-memory webhook settings repository.
#[derive(Debug, Default)]
pub struct InMemoryWebhookSettingsRepository {
    settings: RwLock<HashMap<TenantId, WebhookSettings>>,
}

impl InMemoryWebhookSettingsRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookSettingsRepository for InMemoryWebhookSettingsRepository {
    async fn find_settings(&self, tenant_id: TenantId) -> AppResult<Option<WebhookSettings>> {
        Ok(self.settings.read().await.get(&tenant_id).cloned())
    }

    async fn save_settings(
        &self,
        tenant_id: TenantId,
        settings: WebhookSettings,
    ) -> AppResult<()> {
        self.settings.write().await.insert(tenant_id, settings);
        Ok(())
    }
}
