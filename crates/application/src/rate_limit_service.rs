//! Per-actor abuse control for ticket creation.
//!
//! State is process-local: each `(tenant, actor)` pair gets a sliding-window
//! record on first use, kept until [`RateLimitService::cleanup`] finds it idle.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ticketdesk_core::TenantId;
use ticketdesk_domain::{ActorId, RateLimitDecision, RateLimitSettings, RateLimitState};
use tokio::sync::Mutex;
use tracing::debug;

type ActorKey = (TenantId, ActorId);

/// Application service for per-actor rate limits.
#[derive(Clone, Default)]
pub struct RateLimitService {
    states: Arc<Mutex<HashMap<ActorKey, RateLimitState>>>,
}

impl RateLimitService {
    /// Creates an empty rate limit service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the actor's limits without charging an action.
    pub async fn check_limit(
        &self,
        tenant_id: TenantId,
        actor_id: &ActorId,
        settings: &RateLimitSettings,
    ) -> RateLimitDecision {
        self.check_limit_at(tenant_id, actor_id, settings, Utc::now())
            .await
    }

    /// Checks the actor's limits as of `now`.
    pub async fn check_limit_at(
        &self,
        tenant_id: TenantId,
        actor_id: &ActorId,
        settings: &RateLimitSettings,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        if !settings.enabled {
            return RateLimitDecision::Allowed;
        }

        let mut states = self.states.lock().await;
        let decision = states
            .entry((tenant_id, actor_id.clone()))
            .or_default()
            .check(settings, now);

        if let RateLimitDecision::Rejected {
            reason,
            remaining_seconds,
        } = &decision
        {
            debug!(
                tenant_id = %tenant_id,
                actor_id = %actor_id,
                reason = reason.as_str(),
                remaining_seconds,
                "rate limit rejected action"
            );
        }

        decision
    }

    /// Charges one successful action to the actor.
    pub async fn record_action(&self, tenant_id: TenantId, actor_id: &ActorId) {
        self.record_action_at(tenant_id, actor_id, Utc::now()).await;
    }

    /// Charges one successful action at `now`.
    pub async fn record_action_at(
        &self,
        tenant_id: TenantId,
        actor_id: &ActorId,
        now: DateTime<Utc>,
    ) {
        self.states
            .lock()
            .await
            .entry((tenant_id, actor_id.clone()))
            .or_default()
            .record(now);
    }

    /// Drops state for actors with no action in the last 24 hours and
    /// returns how many were removed.
    pub async fn cleanup(&self, now: DateTime<Utc>) -> usize {
        let mut states = self.states.lock().await;
        let before = states.len();
        states.retain(|_, state| !state.is_idle(now));
        let removed = before - states.len();

        if removed > 0 {
            debug!(removed, "pruned idle rate limit state");
        }

        removed
    }

    /// Clears one actor's counters. Returns whether any state existed.
    pub async fn reset_actor(&self, tenant_id: TenantId, actor_id: &ActorId) -> bool {
        self.states
            .lock()
            .await
            .remove(&(tenant_id, actor_id.clone()))
            .is_some()
    }

    /// Returns the number of tracked actors.
    pub async fn tracked_actors(&self) -> usize {
        self.states.lock().await.len()
    }
}
