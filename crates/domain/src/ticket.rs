use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ActorId;

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Waiting for a staff member.
    #[default]
    Open,
    /// Claimed by a staff member.
    Claimed,
    /// Moved to a higher escalation tier.
    Escalated,
    /// Closed by owner or staff.
    Closed,
    /// Archived with transcript.
    Archived,
}

impl TicketStatus {
    /// Returns a stable display value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Claimed => "claimed",
            Self::Escalated => "escalated",
            Self::Closed => "closed",
            Self::Archived => "archived",
        }
    }
}

/// Ticket priority chosen by staff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// Low priority.
    Low,
    /// Default priority.
    #[default]
    Normal,
    /// High priority.
    High,
    /// Urgent priority.
    Urgent,
}

impl TicketPriority {
    /// Returns a stable display value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Lifecycle event mirrored to notification endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketEvent {
    /// Ticket was opened.
    Created,
    /// Staff member claimed the ticket.
    Claimed,
    /// Claim was released.
    Released,
    /// Ticket moved to another escalation tier.
    Escalated,
    /// Priority changed.
    PriorityChanged,
    /// Ticket was assigned to a staff member.
    Assigned,
    /// Internal note added.
    NoteAdded,
    /// Ticket was closed.
    Closed,
    /// Ticket was reopened.
    Reopened,
    /// Ticket was archived.
    Archived,
}

impl TicketEvent {
    /// Returns a stable storage value for this event.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "ticket.created",
            Self::Claimed => "ticket.claimed",
            Self::Released => "ticket.released",
            Self::Escalated => "ticket.escalated",
            Self::PriorityChanged => "ticket.priority_changed",
            Self::Assigned => "ticket.assigned",
            Self::NoteAdded => "ticket.note_added",
            Self::Closed => "ticket.closed",
            Self::Reopened => "ticket.reopened",
            Self::Archived => "ticket.archived",
        }
    }

    /// Returns a short human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "Ticket opened",
            Self::Claimed => "Ticket claimed",
            Self::Released => "Claim released",
            Self::Escalated => "Ticket escalated",
            Self::PriorityChanged => "Priority changed",
            Self::Assigned => "Ticket assigned",
            Self::NoteAdded => "Internal note added",
            Self::Closed => "Ticket closed",
            Self::Reopened => "Ticket reopened",
            Self::Archived => "Ticket archived",
        }
    }
}

/// One entry in a ticket's activity timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// When the entry happened.
    pub at: DateTime<Utc>,
    /// Actor responsible, if any.
    #[serde(default)]
    pub actor_id: Option<ActorId>,
    /// Human-readable description.
    pub description: String,
}

/// Ticket snapshot consumed from the external ticket store.
///
/// The store owns the record; this crate only reads it and reports the
/// webhook message id / archive flag back for the caller to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Ticket identifier.
    pub id: String,
    /// Actor who opened the ticket.
    pub owner_actor_id: ActorId,
    /// Category name chosen at creation.
    pub category: String,
    /// Current lifecycle status.
    #[serde(default)]
    pub status: TicketStatus,
    /// Current priority.
    #[serde(default)]
    pub priority: TicketPriority,
    /// Staff member currently assigned.
    #[serde(default)]
    pub assigned_actor_id: Option<ActorId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Activity timeline, oldest first.
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    /// Lifecycle message id once the create call succeeded.
    #[serde(default)]
    pub webhook_message_id: Option<String>,
    /// Whether the archive notification already reached an endpoint.
    #[serde(default)]
    pub webhook_sent: bool,
}

impl Ticket {
    /// Returns whether the actor opened this ticket.
    #[must_use]
    pub fn is_owned_by(&self, actor_id: &ActorId) -> bool {
        &self.owner_actor_id == actor_id
    }

    /// Returns the last `limit` timeline entries, oldest first.
    #[must_use]
    pub fn recent_timeline(&self, limit: usize) -> &[TimelineEntry] {
        let start = self.timeline.len().saturating_sub(limit);
        &self.timeline[start..]
    }
}
