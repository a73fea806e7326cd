use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use ticketdesk_core::TenantId;
use ticketdesk_domain::{Ticket, TicketEvent, lifecycle_message};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::notification_ports::{DeliveryMode, WebhookDelivery};

use super::DispatcherSettings;

/// One queued in-place edit.
#[derive(Debug, Clone)]
pub struct DeliveryQueueItem {
    /// Tenant owning the ticket.
    pub tenant_id: TenantId,
    /// Lifecycle endpoint at enqueue time.
    pub url: String,
    /// Sender name resolved at enqueue time.
    pub username: Option<String>,
    /// Message being edited.
    pub message_id: String,
    /// Ticket state to render.
    pub ticket: Ticket,
    /// Event that caused the update.
    pub event: TicketEvent,
    /// Retries spent so far.
    pub retry_count: u32,
}

/// Handle to one tenant's FIFO worker.
pub(super) struct TenantQueue {
    sender: mpsc::UnboundedSender<DeliveryQueueItem>,
    pending: Arc<AtomicUsize>,
}

impl TenantQueue {
    pub(super) fn spawn(
        delivery: Arc<dyn WebhookDelivery>,
        settings: Arc<DispatcherSettings>,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        tokio::spawn(drain(receiver, delivery, settings, pending.clone()));

        Self { sender, pending }
    }

    /// Pushes an item; hands it back when the worker is gone.
    pub(super) fn push(&self, item: DeliveryQueueItem) -> Result<(), DeliveryQueueItem> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.sender.send(item).map_err(|error| {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            error.0
        })
    }

    pub(super) fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Returns whether the worker has shut down.
    pub(super) fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

async fn drain(
    mut receiver: mpsc::UnboundedReceiver<DeliveryQueueItem>,
    delivery: Arc<dyn WebhookDelivery>,
    settings: Arc<DispatcherSettings>,
    pending: Arc<AtomicUsize>,
) {
    loop {
        let item = match tokio::time::timeout(settings.idle_timeout, receiver.recv()).await {
            Ok(Some(item)) => item,
            Ok(None) => break,
            Err(_) => {
                // Items sent before the close still drain; later pushes fail and respawn.
                receiver.close();
                continue;
            }
        };

        process(item, delivery.as_ref(), &settings).await;
        pending.fetch_sub(1, Ordering::SeqCst);
        tokio::time::sleep(settings.item_delay).await;
    }

    debug!("lifecycle update worker idle, shutting down");
}

async fn process(
    mut item: DeliveryQueueItem,
    delivery: &dyn WebhookDelivery,
    settings: &DispatcherSettings,
) {
    loop {
        let message = lifecycle_message(
            &item.ticket,
            item.event,
            item.username.as_deref(),
            Utc::now(),
        );
        let mode = DeliveryMode::Edit {
            message_id: item.message_id.clone(),
        };

        if delivery.deliver(item.url.as_str(), &message, mode).await.is_delivered() {
            debug!(
                tenant_id = %item.tenant_id,
                ticket_id = %item.ticket.id,
                event = item.event.as_str(),
                retry_count = item.retry_count,
                "lifecycle message updated"
            );
            return;
        }

        if item.retry_count >= settings.max_retries {
            warn!(
                tenant_id = %item.tenant_id,
                ticket_id = %item.ticket.id,
                message_id = %item.message_id,
                retry_count = item.retry_count,
                "lifecycle update dropped after exhausting retries"
            );
            return;
        }

        let delay = settings
            .base_delay
            .saturating_mul(2_u32.saturating_pow(item.retry_count));
        item.retry_count += 1;
        debug!(
            tenant_id = %item.tenant_id,
            ticket_id = %item.ticket.id,
            retry_count = item.retry_count,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "retrying lifecycle update"
        );
        tokio::time::sleep(delay).await;
    }
}
