use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use ticketdesk_core::{AppError, AppResult, TenantId};
use ticketdesk_domain::{
    AccessMode, AccessQuery, ActionRule, Actor, ActorId, Capabilities, CategoryOverride,
    PermissionPolicy, Role, RoleId, TicketAction,
};

use crate::access_ports::{
    AccessDecisionCache, AccessDecisionKey, PolicyRepository, VersionedPolicy,
};

use super::AccessControlService;

#[derive(Default)]
struct FakePolicyRepository {
    policies: Mutex<HashMap<TenantId, VersionedPolicy>>,
    reads: AtomicUsize,
    forced_conflicts: AtomicUsize,
}

#[async_trait]
impl PolicyRepository for FakePolicyRepository {
    async fn find_policy(&self, tenant_id: TenantId) -> AppResult<Option<VersionedPolicy>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.policies.lock().await.get(&tenant_id).cloned())
    }

    async fn save_policy(
        &self,
        tenant_id: TenantId,
        policy: PermissionPolicy,
        expected_version: Option<i64>,
    ) -> AppResult<i64> {
        let mut policies = self.policies.lock().await;
        let current = policies.get(&tenant_id).map_or(0, |stored| stored.version);

        if self.forced_conflicts.load(Ordering::SeqCst) > 0 {
            self.forced_conflicts.fetch_sub(1, Ordering::SeqCst);
            let bumped = current + 1;
            let stored = policies.entry(tenant_id).or_default();
            stored.version = bumped;
            return Err(AppError::Conflict(format!(
                "expected version {expected_version:?}, found {bumped}"
            )));
        }

        if expected_version.is_some_and(|expected| expected != current) {
            return Err(AppError::Conflict(format!(
                "expected version {expected_version:?}, found {current}"
            )));
        }

        let version = current + 1;
        policies.insert(tenant_id, VersionedPolicy { policy, version });
        Ok(version)
    }
}

#[derive(Default)]
struct FakeDecisionCache {
    entries: Mutex<HashMap<AccessDecisionKey, bool>>,
    invalidations: Mutex<Vec<TenantId>>,
}

#[async_trait]
impl AccessDecisionCache for FakeDecisionCache {
    async fn get_decision(&self, key: &AccessDecisionKey) -> AppResult<Option<bool>> {
        Ok(self.entries.lock().await.get(key).copied())
    }

    async fn set_decision(
        &self,
        key: AccessDecisionKey,
        allowed: bool,
        _ttl_seconds: u32,
    ) -> AppResult<()> {
        self.entries.lock().await.insert(key, allowed);
        Ok(())
    }

    async fn invalidate_tenant(&self, tenant_id: TenantId) -> AppResult<()> {
        self.entries
            .lock()
            .await
            .retain(|key, _| key.tenant_id != tenant_id);
        self.invalidations.lock().await.push(tenant_id);
        Ok(())
    }
}

fn role_id(value: &str) -> RoleId {
    RoleId::new(value).unwrap_or_else(|_| unreachable!())
}

fn member(id: &str, roles: &[(&str, &str)]) -> Actor {
    Actor::new(
        ActorId::new(id).unwrap_or_else(|_| unreachable!()),
        roles
            .iter()
            .map(|(role, name)| Role::new(role_id(role), *name, Capabilities::NONE))
            .collect(),
    )
}

fn manage_allowlist_policy(role: &str) -> PermissionPolicy {
    let mut policy = PermissionPolicy::default();
    let mut rule = ActionRule::with_mode(AccessMode::Allowlist);
    rule.allowed_role_ids.insert(role_id(role));
    *policy.permissions.rule_mut(TicketAction::Manage) = rule;
    policy
}

#[tokio::test]
async fn missing_policy_reads_as_default_at_version_zero() {
    let service = AccessControlService::new(Arc::new(FakePolicyRepository::default()));

    let policy = service.policy(TenantId::new()).await;

    assert!(policy.is_ok());
    let policy = policy.unwrap_or_default();
    assert_eq!(policy.version, 0);
    assert_eq!(policy.policy, PermissionPolicy::default());
}

#[tokio::test]
async fn require_reports_forbidden_action() {
    let service = AccessControlService::new(Arc::new(FakePolicyRepository::default()));
    let actor = member("1", &[]);

    let result = service
        .require(TenantId::new(), &AccessQuery::new(TicketAction::Manage, &actor))
        .await;

    assert!(
        matches!(result, Err(AppError::Forbidden(message)) if message.contains("manage ticket settings"))
    );
}

#[tokio::test]
async fn authorize_serves_cached_decision_until_policy_write() {
    let repository = Arc::new(FakePolicyRepository::default());
    let cache = Arc::new(FakeDecisionCache::default());
    let service =
        AccessControlService::new(repository.clone()).with_decision_cache(cache.clone(), 300);
    let tenant_id = TenantId::new();
    let actor = member("1", &[("42", "Volunteers")]);
    let query = AccessQuery::new(TicketAction::Manage, &actor);

    assert!(!service.authorize(tenant_id, &query).await.unwrap_or(true));
    assert!(!service.authorize(tenant_id, &query).await.unwrap_or(true));
    assert_eq!(repository.reads.load(Ordering::SeqCst), 1);

    let replaced = service
        .replace_policy(tenant_id, manage_allowlist_policy("42"), Some(0))
        .await;
    assert!(replaced.is_ok());
    assert_eq!(cache.invalidations.lock().await.as_slice(), &[tenant_id]);

    assert!(service.authorize(tenant_id, &query).await.unwrap_or(false));
}

#[tokio::test]
async fn replace_policy_rejects_stale_version() {
    let service = AccessControlService::new(Arc::new(FakePolicyRepository::default()));
    let tenant_id = TenantId::new();

    let first = service
        .replace_policy(tenant_id, PermissionPolicy::default(), Some(0))
        .await;
    assert_eq!(first.map(|stored| stored.version).unwrap_or_default(), 1);

    let stale = service
        .replace_policy(tenant_id, PermissionPolicy::default(), Some(0))
        .await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));

    let unconditional = service
        .replace_policy(tenant_id, PermissionPolicy::default(), None)
        .await;
    assert_eq!(unconditional.map(|stored| stored.version).unwrap_or_default(), 2);
}

#[tokio::test]
async fn replace_policy_validates_document() {
    let service = AccessControlService::new(Arc::new(FakePolicyRepository::default()));
    let mut policy = PermissionPolicy::default();
    policy.rate_limiting.max_per_hour = 0;

    let result = service.replace_policy(TenantId::new(), policy, None).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn update_policy_retries_on_conflict() {
    let repository = Arc::new(FakePolicyRepository::default());
    repository.forced_conflicts.store(2, Ordering::SeqCst);
    let service = AccessControlService::new(repository.clone());
    let tenant_id = TenantId::new();

    let result = service
        .update_policy(tenant_id, |policy| {
            Ok(policy.staff_role_ids.insert(role_id("7")))
        })
        .await;

    assert!(result.is_ok());
    let (stored, inserted) = result.unwrap_or_else(|_| unreachable!());
    assert!(inserted);
    assert_eq!(stored.version, 3);
    assert!(stored.policy.staff_role_ids.contains(&role_id("7")));
}

#[tokio::test]
async fn update_policy_gives_up_after_bounded_attempts() {
    let repository = Arc::new(FakePolicyRepository::default());
    repository.forced_conflicts.store(10, Ordering::SeqCst);
    let service = AccessControlService::new(repository.clone());

    let result = service
        .update_policy(TenantId::new(), |_policy| Ok(()))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(repository.forced_conflicts.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn ticket_quota_uses_category_override() {
    let repository = Arc::new(FakePolicyRepository::default());
    let service = AccessControlService::new(repository);
    let tenant_id = TenantId::new();
    let mut policy = PermissionPolicy::default();
    policy.categories.insert(
        "billing".to_owned(),
        CategoryOverride {
            max_tickets_per_actor: Some(1),
            ..CategoryOverride::default()
        },
    );
    assert!(service.replace_policy(tenant_id, policy, None).await.is_ok());

    assert!(service.check_ticket_quota(tenant_id, "billing", 0).await.is_ok());
    assert!(matches!(
        service.check_ticket_quota(tenant_id, "billing", 1).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(service.check_ticket_quota(tenant_id, "general", 9).await.is_ok());
}

#[tokio::test]
async fn is_staff_reads_tenant_policy() {
    let service = AccessControlService::new(Arc::new(FakePolicyRepository::default()));
    let tenant_id = TenantId::new();
    let actor = member("1", &[("55", "Volunteers")]);

    assert!(!service.is_staff(tenant_id, &actor).await.unwrap_or(true));

    let updated = service
        .update_policy(tenant_id, |policy| {
            policy.staff_role_ids.insert(role_id("55"));
            Ok(())
        })
        .await;
    assert!(updated.is_ok());

    assert!(service.is_staff(tenant_id, &actor).await.unwrap_or(false));
}
