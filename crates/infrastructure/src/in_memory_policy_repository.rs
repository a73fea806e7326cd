use std::collections::HashMap;

use async_trait::async_trait;
use ticketdesk_application::{PolicyRepository, VersionedPolicy};
use ticketdesk_core::{AppError, AppResult, TenantId};
use ticketdesk_domain::PermissionPolicy;
use tokio::sync::RwLock;

/// In-memory policy repository with optimistic versioning.
#[derive(Debug, Default)]
pub struct InMemoryPolicyRepository {
    policies: RwLock<HashMap<TenantId, VersionedPolicy>>,
}

impl InMemoryPolicyRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyRepository for InMemoryPolicyRepository {
    async fn find_policy(&self, tenant_id: TenantId) -> AppResult<Option<VersionedPolicy>> {
        Ok(self.policies.read().await.get(&tenant_id).cloned())
    }

    async fn save_policy(
        &self,
        tenant_id: TenantId,
        policy: PermissionPolicy,
        expected_version: Option<i64>,
    ) -> AppResult<i64> {
        let mut policies = self.policies.write().await;
        let current_version = policies.get(&tenant_id).map_or(0, |stored| stored.version);

        if let Some(expected_version) = expected_version
            && expected_version != current_version
        {
            return Err(AppError::Conflict(format!(
                "policy for tenant '{tenant_id}' is at version {current_version}, expected {expected_version}"
            )));
        }

        let version = current_version + 1;
        policies.insert(tenant_id, VersionedPolicy { policy, version });
        Ok(version)
    }
}
