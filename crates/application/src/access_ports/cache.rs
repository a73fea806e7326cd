use async_trait::async_trait;
use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::{AccessQuery, ActorId, TicketAction};

/// Cache key for one memoized access decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessDecisionKey {
    /// Tenant scope.
    pub tenant_id: TenantId,
    /// Action decided.
    pub action: TicketAction,
    /// Actor decided for.
    pub actor_id: ActorId,
    /// Category, ticket or tier qualifier.
    pub qualifier: Option<String>,
}

impl AccessDecisionKey {
    /// Builds the key for an access query.
    #[must_use]
    pub fn for_query(tenant_id: TenantId, query: &AccessQuery<'_>) -> Self {
        Self {
            tenant_id,
            action: query.action,
            actor_id: query.actor.id().clone(),
            qualifier: query.cache_qualifier(),
        }
    }
}

/// Optional cache port for access decisions.
#[async_trait]
pub trait AccessDecisionCache: Send + Sync {
    /// Returns a cached decision that has not expired.
    async fn get_decision(&self, key: &AccessDecisionKey) -> AppResult<Option<bool>>;

    /// Stores one decision with ttl.
    async fn set_decision(
        &self,
        key: AccessDecisionKey,
        allowed: bool,
        ttl_seconds: u32,
    ) -> AppResult<()>;

    /// Drops every cached decision of one tenant.
    async fn invalidate_tenant(&self, tenant_id: TenantId) -> AppResult<()>;
}
