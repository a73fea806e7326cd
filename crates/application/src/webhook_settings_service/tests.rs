use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ticketdesk_core::{AppError, AppResult, TenantId};
use ticketdesk_domain::{ArchiveEndpoint, NotificationTarget, WebhookSettings};

use crate::notification_ports::WebhookSettingsRepository;

use super::WebhookSettingsService;

#[derive(Default)]
struct FakeSettingsRepository {
    settings: Mutex<HashMap<TenantId, WebhookSettings>>,
}

#[async_trait]
impl WebhookSettingsRepository for FakeSettingsRepository {
    async fn find_settings(&self, tenant_id: TenantId) -> AppResult<Option<WebhookSettings>> {
        Ok(self.settings.lock().await.get(&tenant_id).cloned())
    }

    async fn save_settings(
        &self,
        tenant_id: TenantId,
        settings: WebhookSettings,
    ) -> AppResult<()> {
        self.settings.lock().await.insert(tenant_id, settings);
        Ok(())
    }
}

#[tokio::test]
async fn unknown_tenant_reads_empty_settings() {
    let service = WebhookSettingsService::new(Arc::new(FakeSettingsRepository::default()));

    let settings = service.settings(TenantId::new()).await;

    assert_eq!(settings.unwrap_or_default(), WebhookSettings::default());
}

#[tokio::test]
async fn save_rejects_non_http_archive_endpoint() {
    let repository = Arc::new(FakeSettingsRepository::default());
    let service = WebhookSettingsService::new(repository.clone());
    let settings = WebhookSettings {
        archive_endpoints: vec![ArchiveEndpoint {
            url: "ftp://files.example.test/drop".to_owned(),
            name: "ftp".to_owned(),
            channel_id: None,
        }],
        ..WebhookSettings::default()
    };

    let result = service.save_settings(TenantId::new(), settings).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repository.settings.lock().await.is_empty());
}

#[tokio::test]
async fn saved_settings_round_trip_through_repository() {
    let service = WebhookSettingsService::new(Arc::new(FakeSettingsRepository::default()));
    let tenant_id = TenantId::new();
    let settings = WebhookSettings {
        lifecycle: Some(NotificationTarget {
            enabled: true,
            url: "https://hooks.example.test/api/webhooks/1/abc".to_owned(),
            name: "Tickets".to_owned(),
        }),
        ..WebhookSettings::default()
    };

    assert!(service.save_settings(tenant_id, settings.clone()).await.is_ok());

    assert_eq!(service.settings(tenant_id).await.unwrap_or_default(), settings);
}
