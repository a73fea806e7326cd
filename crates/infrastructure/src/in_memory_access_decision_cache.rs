use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ticketdesk_application::{AccessDecisionCache, AccessDecisionKey};
use ticketdesk_core::{AppResult, TenantId};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
struct AccessDecisionEntry {
    allowed: bool,
    expires_at: Instant,
}

/// In-memory cache adapter for access decisions.
#[derive(Default)]
pub struct InMemoryAccessDecisionCache {
    entries: RwLock<HashMap<AccessDecisionKey, AccessDecisionEntry>>,
}

impl InMemoryAccessDecisionCache {
    /// Creates an empty in-memory decision cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessDecisionCache for InMemoryAccessDecisionCache {
    async fn get_decision(&self, key: &AccessDecisionKey) -> AppResult<Option<bool>> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                if entry.expires_at > Instant::now() {
                    return Ok(Some(entry.allowed));
                }
            } else {
                return Ok(None);
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            entries.remove(key);
        }

        Ok(None)
    }

    async fn set_decision(
        &self,
        key: AccessDecisionKey,
        allowed: bool,
        ttl_seconds: u32,
    ) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(u64::from(ttl_seconds)))
            .unwrap_or(now);

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(key, AccessDecisionEntry { allowed, expires_at });

        Ok(())
    }

    async fn invalidate_tenant(&self, tenant_id: TenantId) -> AppResult<()> {
        self.entries
            .write()
            .await
            .retain(|key, _| key.tenant_id != tenant_id);

        Ok(())
    }
}
