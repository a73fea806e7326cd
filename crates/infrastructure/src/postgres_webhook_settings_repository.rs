//! PostgreSQL-backed webhook settings repository using the `webhook_settings` table.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use ticketdesk_application::WebhookSettingsRepository;
use ticketdesk_core::{AppError, AppResult, TenantId};
use ticketdesk_domain::WebhookSettings;

/// PostgreSQL implementation of the webhook settings repository port.
#[derive(Clone)]
pub struct PostgresWebhookSettingsRepository {
    pool: PgPool,
}

impl PostgresWebhookSettingsRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WebhookSettingsRepository for PostgresWebhookSettingsRepository {
    async fn find_settings(&self, tenant_id: TenantId) -> AppResult<Option<WebhookSettings>> {
        let document = sqlx::query_scalar::<_, Json<WebhookSettings>>(
            r#"
            SELECT document
            FROM webhook_settings
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load webhook settings: {error}")))?;

        Ok(document.map(|document| document.0))
    }

    async fn save_settings(
        &self,
        tenant_id: TenantId,
        settings: WebhookSettings,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO webhook_settings (tenant_id, document, version)
            VALUES ($1, $2, 1)
            ON CONFLICT (tenant_id) DO UPDATE
            SET
                document = EXCLUDED.document,
                version = webhook_settings.version + 1,
                updated_at = now()
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(Json(&settings))
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save webhook settings: {error}")))?;

        Ok(())
    }
}
