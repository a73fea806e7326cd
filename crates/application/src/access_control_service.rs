//! Access decisions and policy administration for one tenant at a time.

use std::sync::Arc;

use ticketdesk_core::{AppError, AppResult, TenantId};
use ticketdesk_domain::{AccessQuery, Actor, PermissionPolicy};
use tracing::{debug, info, warn};

use crate::access_ports::{
    AccessDecisionCache, AccessDecisionKey, PolicyRepository, VersionedPolicy,
};

/// Optimistic write attempts made by [`AccessControlService::update_policy`].
pub const POLICY_UPDATE_ATTEMPTS: usize = 3;

/// Application service resolving access decisions against tenant policies.
#[derive(Clone)]
pub struct AccessControlService {
    repository: Arc<dyn PolicyRepository>,
    decision_cache: Option<Arc<dyn AccessDecisionCache>>,
    decision_cache_ttl_seconds: u32,
}

impl AccessControlService {
    /// Creates an access control service without decision caching.
    #[must_use]
    pub fn new(repository: Arc<dyn PolicyRepository>) -> Self {
        Self {
            repository,
            decision_cache: None,
            decision_cache_ttl_seconds: 0,
        }
    }

    /// Adds optional decision caching.
    #[must_use]
    pub fn with_decision_cache(
        mut self,
        decision_cache: Arc<dyn AccessDecisionCache>,
        ttl_seconds: u32,
    ) -> Self {
        self.decision_cache = Some(decision_cache);
        self.decision_cache_ttl_seconds = ttl_seconds;
        self
    }

    /// Returns the tenant policy, or the default policy at version 0.
    pub async fn policy(&self, tenant_id: TenantId) -> AppResult<VersionedPolicy> {
        Ok(self
            .repository
            .find_policy(tenant_id)
            .await?
            .unwrap_or_default())
    }

    /// Answers one access query.
    pub async fn authorize(&self, tenant_id: TenantId, query: &AccessQuery<'_>) -> AppResult<bool> {
        let key = AccessDecisionKey::for_query(tenant_id, query);

        if self.decision_cache_ttl_seconds > 0
            && let Some(cache) = &self.decision_cache
            && let Some(allowed) = cache.get_decision(&key).await?
        {
            return Ok(allowed);
        }

        let policy = self.policy(tenant_id).await?.policy;
        let allowed = policy.evaluate(query);
        debug!(
            tenant_id = %tenant_id,
            action = query.action.as_str(),
            actor_id = %query.actor.id(),
            allowed,
            "access decision evaluated"
        );

        if self.decision_cache_ttl_seconds > 0
            && let Some(cache) = &self.decision_cache
        {
            cache
                .set_decision(key, allowed, self.decision_cache_ttl_seconds)
                .await?;
        }

        Ok(allowed)
    }

    /// Fails with `Forbidden` unless the query is allowed.
    pub async fn require(&self, tenant_id: TenantId, query: &AccessQuery<'_>) -> AppResult<()> {
        if self.authorize(tenant_id, query).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "you are not allowed to {}",
            query.action.describe()
        )))
    }

    /// Returns whether the actor counts as staff in the tenant.
    pub async fn is_staff(&self, tenant_id: TenantId, actor: &Actor) -> AppResult<bool> {
        Ok(self.policy(tenant_id).await?.policy.is_staff(actor))
    }

    /// Fails with `Forbidden` when the actor already holds the category's
    /// maximum number of open tickets.
    pub async fn check_ticket_quota(
        &self,
        tenant_id: TenantId,
        category: &str,
        open_tickets: u32,
    ) -> AppResult<()> {
        let policy = self.policy(tenant_id).await?.policy;
        if policy.within_ticket_quota(category, open_tickets) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "open ticket limit reached for category '{category}'"
        )))
    }

    /// Replaces the tenant policy.
    ///
    /// With `expected_version`, the write is rejected with `Conflict` when
    /// another writer got there first.
    pub async fn replace_policy(
        &self,
        tenant_id: TenantId,
        policy: PermissionPolicy,
        expected_version: Option<i64>,
    ) -> AppResult<VersionedPolicy> {
        policy.validate()?;

        let version = self
            .repository
            .save_policy(tenant_id, policy.clone(), expected_version)
            .await?;
        self.invalidate_decisions(tenant_id).await?;

        info!(tenant_id = %tenant_id, version, "permission policy replaced");
        Ok(VersionedPolicy { policy, version })
    }

    /// Applies `mutate` to the current policy and writes it back.
    ///
    /// Conflicting concurrent writes are retried against the fresh document up
    /// to [`POLICY_UPDATE_ATTEMPTS`] times.
    pub async fn update_policy<T, F>(
        &self,
        tenant_id: TenantId,
        mut mutate: F,
    ) -> AppResult<(VersionedPolicy, T)>
    where
        F: FnMut(&mut PermissionPolicy) -> AppResult<T> + Send,
        T: Send,
    {
        let mut last_conflict = None;

        for attempt in 1..=POLICY_UPDATE_ATTEMPTS {
            let VersionedPolicy {
                mut policy,
                version,
            } = self.policy(tenant_id).await?;

            let output = mutate(&mut policy)?;
            policy.validate()?;

            match self
                .repository
                .save_policy(tenant_id, policy.clone(), Some(version))
                .await
            {
                Ok(version) => {
                    self.invalidate_decisions(tenant_id).await?;
                    info!(tenant_id = %tenant_id, version, "permission policy updated");
                    return Ok((VersionedPolicy { policy, version }, output));
                }
                Err(AppError::Conflict(message)) => {
                    warn!(
                        tenant_id = %tenant_id,
                        attempt,
                        "permission policy write conflicted, retrying"
                    );
                    last_conflict = Some(message);
                }
                Err(error) => return Err(error),
            }
        }

        Err(AppError::Conflict(last_conflict.unwrap_or_else(|| {
            "permission policy changed concurrently".to_owned()
        })))
    }

    async fn invalidate_decisions(&self, tenant_id: TenantId) -> AppResult<()> {
        if let Some(cache) = &self.decision_cache {
            cache.invalidate_tenant(tenant_id).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
