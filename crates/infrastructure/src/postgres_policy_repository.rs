//! PostgreSQL-backed policy repository using the `ticket_policies` table.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use ticketdesk_application::{PolicyRepository, VersionedPolicy};
use ticketdesk_core::{AppError, AppResult, TenantId};
use ticketdesk_domain::PermissionPolicy;

/// PostgreSQL implementation of the policy repository port.
///
/// Each tenant has one JSON document row; `version` guards conditional writes.
#[derive(Clone)]
pub struct PostgresPolicyRepository {
    pool: PgPool,
}

impl PostgresPolicyRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_new(
        &self,
        tenant_id: TenantId,
        policy: &PermissionPolicy,
    ) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO ticket_policies (tenant_id, document, version)
            VALUES ($1, $2, 1)
            ON CONFLICT (tenant_id) DO NOTHING
            RETURNING version
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(Json(policy))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert ticket policy: {error}")))
    }

    async fn update_versioned(
        &self,
        tenant_id: TenantId,
        policy: &PermissionPolicy,
        expected_version: i64,
    ) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE ticket_policies
            SET document = $2, version = version + 1, updated_at = now()
            WHERE tenant_id = $1 AND version = $3
            RETURNING version
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(Json(policy))
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update ticket policy: {error}")))
    }

    async fn upsert(&self, tenant_id: TenantId, policy: &PermissionPolicy) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO ticket_policies (tenant_id, document, version)
            VALUES ($1, $2, 1)
            ON CONFLICT (tenant_id) DO UPDATE
            SET
                document = EXCLUDED.document,
                version = ticket_policies.version + 1,
                updated_at = now()
            RETURNING version
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(Json(policy))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save ticket policy: {error}")))
    }
}

#[derive(Debug, FromRow)]
struct PolicyRow {
    document: Json<PermissionPolicy>,
    version: i64,
}

#[async_trait]
impl PolicyRepository for PostgresPolicyRepository {
    async fn find_policy(&self, tenant_id: TenantId) -> AppResult<Option<VersionedPolicy>> {
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT document, version
            FROM ticket_policies
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load ticket policy: {error}")))?;

        Ok(row.map(|row| VersionedPolicy {
            policy: row.document.0,
            version: row.version,
        }))
    }

    async fn save_policy(
        &self,
        tenant_id: TenantId,
        policy: PermissionPolicy,
        expected_version: Option<i64>,
    ) -> AppResult<i64> {
        let written = match expected_version {
            None => return self.upsert(tenant_id, &policy).await,
            Some(0) => self.insert_new(tenant_id, &policy).await?,
            Some(expected_version) => {
                self.update_versioned(tenant_id, &policy, expected_version)
                    .await?
            }
        };

        written.ok_or_else(|| {
            AppError::Conflict(format!(
                "policy for tenant '{tenant_id}' changed since version {}",
                expected_version.unwrap_or_default()
            ))
        })
    }
}
