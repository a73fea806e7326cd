//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod actor;
mod capability;
mod notification;
mod policy;
mod rate_limit;
mod staff_detection;
mod ticket;
mod webhook;

pub use access::AccessQuery;
pub use actor::{Actor, ActorId, Role, RoleId};
pub use capability::Capabilities;
pub use notification::{
    Embed, EmbedField, EmbedFooter, TIMELINE_PREVIEW_LEN, WebhookMessage, archive_message,
    archive_status_line, lifecycle_message,
};
pub use policy::{
    AccessMode, ActionPermissions, ActionRule, CategoryOverride, EscalationSettings,
    EscalationTier, PermissionPolicy, TicketAction, TierScope,
};
pub use rate_limit::{RateLimitDecision, RateLimitReason, RateLimitSettings, RateLimitState};
pub use staff_detection::{
    AutoConfigureReport, DetectionReason, STAFF_NAME_DICTIONARY, StaffNameCategory,
    StaffRoleMatch, StaffSuggestions, classify_role, match_staff_name, normalize_role_name,
    scan_roles,
};
pub use ticket::{Ticket, TicketEvent, TicketPriority, TicketStatus, TimelineEntry};
pub use webhook::{
    ArchiveEndpoint, LogChannel, NotificationTarget, WebhookSettings, validate_webhook_url,
};
