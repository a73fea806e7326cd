//! One-message-per-ticket lifecycle notifications.
//!
//! The first dispatch for a ticket creates the external message synchronously
//! so the caller can persist its id. Every later dispatch is an in-place edit
//! pushed onto the tenant's FIFO queue and drained by a single worker task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::{Ticket, TicketEvent, lifecycle_message};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::notification_ports::{
    DeliveryMode, DeliveryReceipt, WebhookDelivery, WebhookSettingsRepository,
};

mod queue;

use queue::TenantQueue;
pub use queue::DeliveryQueueItem;

/// Retry and pacing settings for queued updates.
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    /// Sender name used when the lifecycle target does not name one.
    pub username: Option<String>,
    /// Extra attempts made for a failed update before it is dropped.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub base_delay: Duration,
    /// Pause after each processed item.
    pub item_delay: Duration,
    /// How long a tenant worker waits for work before it shuts down.
    pub idle_timeout: Duration,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            username: None,
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            item_delay: Duration::from_millis(1000),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

/// Result of one `send_or_update` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new message was created; the caller must store `message_id` on the ticket.
    Created {
        /// Id of the created message.
        message_id: String,
    },
    /// An edit was queued.
    Queued,
    /// The tenant has no active lifecycle target.
    Skipped,
    /// The create call failed; the ticket stays without a message.
    Failed,
}

/// Application service keeping one live lifecycle message per ticket.
#[derive(Clone)]
pub struct NotificationDispatcher {
    settings_repository: Arc<dyn WebhookSettingsRepository>,
    delivery: Arc<dyn WebhookDelivery>,
    settings: Arc<DispatcherSettings>,
    queues: Arc<Mutex<HashMap<TenantId, TenantQueue>>>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(
        settings_repository: Arc<dyn WebhookSettingsRepository>,
        delivery: Arc<dyn WebhookDelivery>,
        settings: DispatcherSettings,
    ) -> Self {
        Self {
            settings_repository,
            delivery,
            settings: Arc::new(settings),
            queues: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Reflects a ticket state change to the tenant's lifecycle endpoint.
    ///
    /// Without a stored message id this issues exactly one create call.
    /// With one, it queues an edit and returns immediately.
    pub async fn send_or_update(
        &self,
        tenant_id: TenantId,
        ticket: &Ticket,
        event: TicketEvent,
    ) -> AppResult<DispatchOutcome> {
        let settings = self
            .settings_repository
            .find_settings(tenant_id)
            .await?
            .unwrap_or_default();

        let Some(target) = settings.active_lifecycle_target() else {
            debug!(tenant_id = %tenant_id, ticket_id = %ticket.id, "no lifecycle target configured");
            return Ok(DispatchOutcome::Skipped);
        };

        let username = target
            .sender_name(self.settings.username.as_deref())
            .map(str::to_owned);

        let Some(message_id) = ticket.webhook_message_id.clone() else {
            return Ok(self
                .create_message(tenant_id, target.url.as_str(), username.as_deref(), ticket, event)
                .await);
        };

        let item = DeliveryQueueItem {
            tenant_id,
            url: target.url.clone(),
            username,
            message_id,
            ticket: ticket.clone(),
            event,
            retry_count: 0,
        };
        self.enqueue(item).await;

        Ok(DispatchOutcome::Queued)
    }

    /// Returns the number of queued or in-flight updates for a tenant.
    pub async fn pending_updates(&self, tenant_id: TenantId) -> usize {
        self.queues
            .lock()
            .await
            .get(&tenant_id)
            .map_or(0, TenantQueue::pending)
    }

    async fn create_message(
        &self,
        tenant_id: TenantId,
        url: &str,
        username: Option<&str>,
        ticket: &Ticket,
        event: TicketEvent,
    ) -> DispatchOutcome {
        let message = lifecycle_message(ticket, event, username, Utc::now());

        match self.delivery.deliver(url, &message, DeliveryMode::Create).await {
            DeliveryReceipt::Delivered {
                message_id: Some(message_id),
            } => {
                info!(
                    tenant_id = %tenant_id,
                    ticket_id = %ticket.id,
                    message_id = %message_id,
                    "lifecycle message created"
                );
                DispatchOutcome::Created { message_id }
            }
            DeliveryReceipt::Delivered { message_id: None } => {
                warn!(
                    tenant_id = %tenant_id,
                    ticket_id = %ticket.id,
                    "lifecycle endpoint accepted create without returning a message id"
                );
                DispatchOutcome::Failed
            }
            DeliveryReceipt::Failed => {
                warn!(
                    tenant_id = %tenant_id,
                    ticket_id = %ticket.id,
                    "lifecycle message create failed"
                );
                DispatchOutcome::Failed
            }
        }
    }

    async fn enqueue(&self, item: DeliveryQueueItem) {
        let mut queues = self.queues.lock().await;
        let tenant_id = item.tenant_id;
        queues.retain(|_, queue| !queue.is_closed());

        let item = match queues.get(&tenant_id) {
            Some(queue) => match queue.push(item) {
                Ok(()) => return,
                Err(item) => item,
            },
            None => item,
        };

        let queue = TenantQueue::spawn(self.delivery.clone(), self.settings.clone());
        debug!(tenant_id = %tenant_id, "started lifecycle update worker");
        if let Err(item) = queue.push(item) {
            warn!(
                tenant_id = %item.tenant_id,
                ticket_id = %item.ticket.id,
                "lifecycle update worker unavailable, dropping update"
            );
        }
        queues.insert(tenant_id, queue);
    }
}
