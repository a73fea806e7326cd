use serde::{Deserialize, Serialize};
use ticketdesk_application::{DispatchOutcome, FanoutOutcome};
use ticketdesk_domain::{Ticket, TicketEvent};
use ts_rs::TS;

/// Ticket state change to mirror to the lifecycle endpoint.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/notification-request.ts"
)]
pub struct NotificationRequest {
    #[ts(type = "Record<string, unknown>")]
    pub ticket: Ticket,
    #[ts(
        type = "\"created\" | \"claimed\" | \"released\" | \"escalated\" | \"priority_changed\" | \"assigned\" | \"note_added\" | \"closed\" | \"reopened\" | \"archived\""
    )]
    pub event: TicketEvent,
}

/// Result of a lifecycle notification.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/notification-response.ts"
)]
pub struct NotificationResponse {
    /// `created`, `queued`, `skipped` or `failed`.
    pub outcome: String,
    /// Set on `created`; the caller stores it on the ticket.
    pub message_id: Option<String>,
}

impl From<DispatchOutcome> for NotificationResponse {
    fn from(value: DispatchOutcome) -> Self {
        let (outcome, message_id) = match value {
            DispatchOutcome::Created { message_id } => ("created", Some(message_id)),
            DispatchOutcome::Queued => ("queued", None),
            DispatchOutcome::Skipped => ("skipped", None),
            DispatchOutcome::Failed => ("failed", None),
        };

        Self {
            outcome: outcome.to_owned(),
            message_id,
        }
    }
}

/// Lifecycle updates waiting in a tenant's queue.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/pending-updates-response.ts"
)]
pub struct PendingUpdatesResponse {
    pub pending: usize,
}

/// Archived ticket to announce.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/archive-request.ts"
)]
pub struct ArchiveRequest {
    #[ts(type = "Record<string, unknown>")]
    pub ticket: Ticket,
    pub reason: String,
}

/// Result of an archive fanout.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/archive-response.ts"
)]
pub struct ArchiveResponse {
    /// `already_sent`, `delivered`, `logged_to_channel`, `logged_to_private_endpoint` or `undelivered`.
    pub outcome: String,
    pub endpoint_url: Option<String>,
    /// Updated flag the caller persists on the ticket.
    pub webhook_sent: bool,
}

impl ArchiveResponse {
    /// Builds the response from the fanout outcome and the resulting flag.
    #[must_use]
    pub fn from_outcome(outcome: FanoutOutcome, webhook_sent: bool) -> Self {
        let (outcome, endpoint_url) = match outcome {
            FanoutOutcome::AlreadySent => ("already_sent", None),
            FanoutOutcome::Delivered { endpoint_url } => ("delivered", Some(endpoint_url)),
            FanoutOutcome::LoggedToChannel => ("logged_to_channel", None),
            FanoutOutcome::LoggedToPrivateEndpoint => ("logged_to_private_endpoint", None),
            FanoutOutcome::Undelivered => ("undelivered", None),
        };

        Self {
            outcome: outcome.to_owned(),
            endpoint_url,
            webhook_sent,
        }
    }
}
