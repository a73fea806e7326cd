use std::sync::Arc;

use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::WebhookSettings;
use tracing::info;

use crate::notification_ports::WebhookSettingsRepository;

/// Reads and writes per-tenant webhook settings.
#[derive(Clone)]
pub struct WebhookSettingsService {
    repository: Arc<dyn WebhookSettingsRepository>,
}

impl WebhookSettingsService {
    /// Creates a webhook settings service.
    #[must_use]
    pub fn new(repository: Arc<dyn WebhookSettingsRepository>) -> Self {
        Self { repository }
    }

    /// Returns the tenant's settings, empty when none are stored.
    pub async fn settings(&self, tenant_id: TenantId) -> AppResult<WebhookSettings> {
        Ok(self
            .repository
            .find_settings(tenant_id)
            .await?
            .unwrap_or_default())
    }

    /// Validates and stores the tenant's settings.
    pub async fn save_settings(
        &self,
        tenant_id: TenantId,
        settings: WebhookSettings,
    ) -> AppResult<WebhookSettings> {
        settings.validate()?;
        self.repository
            .save_settings(tenant_id, settings.clone())
            .await?;

        info!(
            tenant_id = %tenant_id,
            lifecycle_enabled = settings.active_lifecycle_target().is_some(),
            archive_endpoints = settings.archive_endpoints.len(),
            "webhook settings saved"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests;
