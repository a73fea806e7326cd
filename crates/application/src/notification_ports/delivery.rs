use async_trait::async_trait;
use ticketdesk_domain::WebhookMessage;

/// Whether a delivery creates a message or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Post a new message.
    Create,
    /// Edit a message in place.
    Edit {
        /// Message returned by the original create call.
        message_id: String,
    },
}

/// Terminal result of one delivery, after retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReceipt {
    /// The endpoint accepted the message.
    Delivered {
        /// Id of the created message, when the endpoint returned one.
        message_id: Option<String>,
    },
    /// Every attempt failed.
    Failed,
}

impl DeliveryReceipt {
    /// Returns whether the endpoint accepted the message.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Outbound webhook port.
///
/// Implementations retry internally and never return an error.
#[async_trait]
pub trait WebhookDelivery: Send + Sync {
    /// Sends one message to `url`.
    async fn deliver(
        &self,
        url: &str,
        message: &WebhookMessage,
        mode: DeliveryMode,
    ) -> DeliveryReceipt;
}
