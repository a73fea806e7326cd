//! Webhook message payloads for ticket lifecycle and archive notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActorId, Ticket, TicketEvent, TicketStatus};

/// Timeline entries included in a lifecycle message.
pub const TIMELINE_PREVIEW_LEN: usize = 5;

/// Maximum characters the platform accepts in one embed field value.
pub const EMBED_FIELD_VALUE_LIMIT: usize = 1024;

const EMPTY_FIELD_PLACEHOLDER: &str = "-";

/// Body of a webhook create or edit call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    /// Sender name override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Rich embeds.
    pub embeds: Vec<Embed>,
}

/// Rich embed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Embed title.
    pub title: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Side bar color.
    pub color: u32,
    /// Key/value fields.
    pub fields: Vec<EmbedField>,
    /// Footer text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    /// Timestamp shown by the client.
    pub timestamp: DateTime<Utc>,
}

/// Embed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field label.
    pub name: String,
    /// Field value.
    pub value: String,
    /// Whether the field renders inline.
    pub inline: bool,
}

/// Embed footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
}

fn status_color(status: TicketStatus) -> u32 {
    match status {
        TicketStatus::Open => 0x0057_F287,
        TicketStatus::Claimed => 0x0058_65F2,
        TicketStatus::Escalated => 0x00FE_E75C,
        TicketStatus::Closed => 0x00ED_4245,
        TicketStatus::Archived => 0x0099_AAB5,
    }
}

fn mention(actor_id: &ActorId) -> String {
    format!("<@{actor_id}>")
}

fn field(name: &str, value: String, inline: bool) -> EmbedField {
    EmbedField {
        name: name.to_owned(),
        value: field_value(value),
        inline,
    }
}

/// Truncates oversized values and replaces blank ones with a placeholder.
fn field_value(value: String) -> String {
    if value.trim().is_empty() {
        return EMPTY_FIELD_PLACEHOLDER.to_owned();
    }

    if value.chars().count() <= EMBED_FIELD_VALUE_LIMIT {
        return value;
    }

    let mut truncated: String = value.chars().take(EMBED_FIELD_VALUE_LIMIT - 1).collect();
    truncated.push('…');
    truncated
}

/// Builds the lifecycle message summarizing the ticket's current state.
#[must_use]
pub fn lifecycle_message(
    ticket: &Ticket,
    event: TicketEvent,
    username: Option<&str>,
    now: DateTime<Utc>,
) -> WebhookMessage {
    let mut fields = vec![
        field("Owner", mention(&ticket.owner_actor_id), true),
        field("Category", ticket.category.clone(), true),
        field("Status", ticket.status.as_str().to_owned(), true),
        field("Priority", ticket.priority.as_str().to_owned(), true),
        field(
            "Assignee",
            ticket
                .assigned_actor_id
                .as_ref()
                .map(mention)
                .unwrap_or_else(|| "unassigned".to_owned()),
            true,
        ),
    ];

    let timeline = ticket.recent_timeline(TIMELINE_PREVIEW_LEN);
    if !timeline.is_empty() {
        let lines = timeline
            .iter()
            .map(|entry| match &entry.actor_id {
                Some(actor_id) => format!(
                    "<t:{}:R> {} ({})",
                    entry.at.timestamp(),
                    entry.description,
                    mention(actor_id)
                ),
                None => format!("<t:{}:R> {}", entry.at.timestamp(), entry.description),
            })
            .collect::<Vec<_>>()
            .join("\n");
        fields.push(field("Recent activity", lines, false));
    }

    WebhookMessage {
        username: username.map(str::to_owned),
        embeds: vec![Embed {
            title: format!("Ticket {}", ticket.id),
            description: Some(event.label().to_owned()),
            color: status_color(ticket.status),
            fields,
            footer: Some(EmbedFooter {
                text: format!("opened <t:{}:f>", ticket.created_at.timestamp()),
            }),
            timestamp: now,
        }],
    }
}

/// Builds the one-shot archive notification.
#[must_use]
pub fn archive_message(
    ticket: &Ticket,
    reason: &str,
    username: Option<&str>,
    now: DateTime<Utc>,
) -> WebhookMessage {
    WebhookMessage {
        username: username.map(str::to_owned),
        embeds: vec![Embed {
            title: format!("Ticket {} archived", ticket.id),
            description: Some(reason.to_owned()),
            color: status_color(TicketStatus::Archived),
            fields: vec![
                field("Owner", mention(&ticket.owner_actor_id), true),
                field("Category", ticket.category.clone(), true),
                field("Priority", ticket.priority.as_str().to_owned(), true),
            ],
            footer: None,
            timestamp: now,
        }],
    }
}

/// Plain status line used when no archive endpoint accepted the message.
#[must_use]
pub fn archive_status_line(ticket: &Ticket, reason: &str) -> String {
    format!(
        "Ticket {} ({}) by {} archived: {reason}",
        ticket.id,
        ticket.category,
        mention(&ticket.owner_actor_id)
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{EMBED_FIELD_VALUE_LIMIT, archive_status_line, lifecycle_message};
    use crate::{ActorId, Ticket, TicketEvent, TicketPriority, TicketStatus, TimelineEntry};

    fn ticket_with_timeline(entries: i64) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: "T-7".to_owned(),
            owner_actor_id: ActorId::new("11").unwrap_or_else(|_| unreachable!()),
            category: "billing".to_owned(),
            status: TicketStatus::Claimed,
            priority: TicketPriority::High,
            assigned_actor_id: Some(ActorId::new("22").unwrap_or_else(|_| unreachable!())),
            created_at: now,
            timeline: (0..entries)
                .map(|index| TimelineEntry {
                    at: now + Duration::seconds(index),
                    actor_id: None,
                    description: format!("step {index}"),
                })
                .collect(),
            webhook_message_id: None,
            webhook_sent: false,
        }
    }

    #[test]
    fn lifecycle_message_summarizes_ticket_state() {
        let ticket = ticket_with_timeline(8);
        let message = lifecycle_message(&ticket, TicketEvent::Claimed, Some("Tickets"), Utc::now());

        assert_eq!(message.username.as_deref(), Some("Tickets"));
        let embed = &message.embeds[0];
        let names: Vec<&str> = embed.fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Owner", "Category", "Status", "Priority", "Assignee", "Recent activity"]
        );
        assert_eq!(embed.fields[4].value, "<@22>");

        let activity = &embed.fields[5].value;
        assert_eq!(activity.lines().count(), 5);
        assert!(activity.contains("step 7"));
        assert!(!activity.contains("step 2"));
    }

    #[test]
    fn lifecycle_message_omits_empty_timeline() {
        let ticket = ticket_with_timeline(0);
        let message = lifecycle_message(&ticket, TicketEvent::Created, None, Utc::now());
        let value = serde_json::to_value(&message).unwrap_or_default();

        assert!(value.get("username").is_none());
        assert_eq!(message.embeds[0].fields.len(), 5);
    }

    #[test]
    fn archive_status_line_mentions_owner() {
        let line = archive_status_line(&ticket_with_timeline(0), "resolved");
        assert_eq!(line, "Ticket T-7 (billing) by <@11> archived: resolved");
    }

    #[test]
    fn oversized_and_blank_field_values_are_fitted() {
        let mut ticket = ticket_with_timeline(3);
        ticket.category = "   ".to_owned();
        for entry in &mut ticket.timeline {
            entry.description = "é".repeat(600);
        }

        let message = lifecycle_message(&ticket, TicketEvent::NoteAdded, None, Utc::now());
        let fields = &message.embeds[0].fields;

        let category = fields.iter().find(|field| field.name == "Category");
        assert_eq!(category.map(|field| field.value.as_str()), Some("-"));

        let activity = fields.iter().find(|field| field.name == "Recent activity");
        assert!(activity.is_some_and(|field| {
            field.value.chars().count() == EMBED_FIELD_VALUE_LIMIT && field.value.ends_with('…')
        }));
        assert!(fields.iter().all(|field| !field.value.trim().is_empty()));
    }
}
