use async_trait::async_trait;
use serde::Serialize;
use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::PermissionPolicy;

/// Stored policy document with its optimistic concurrency version.
///
/// A tenant without a stored document reads as the default policy at version 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedPolicy {
    /// Policy document.
    pub policy: PermissionPolicy,
    /// Version incremented on every write.
    pub version: i64,
}

/// Repository port for per-tenant permission policy documents.
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Returns the stored policy, if any.
    async fn find_policy(&self, tenant_id: TenantId) -> AppResult<Option<VersionedPolicy>>;

    /// Writes the whole policy document and returns the new version.
    ///
    /// With `expected_version`, the write fails with `AppError::Conflict` unless
    /// the stored version (0 when absent) matches. Without it the write is
    /// unconditional.
    async fn save_policy(
        &self,
        tenant_id: TenantId,
        policy: PermissionPolicy,
        expected_version: Option<i64>,
    ) -> AppResult<i64>;
}
