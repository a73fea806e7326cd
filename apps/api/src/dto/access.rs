use serde::{Deserialize, Serialize};
use ticketdesk_domain::Ticket;
use ts_rs::TS;

use super::ActorRequest;

/// Incoming payload for one authorization check.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-check-request.ts"
)]
pub struct AccessCheckRequest {
    pub actor: ActorRequest,
    #[ts(type = "Record<string, unknown> | null")]
    pub ticket: Option<Ticket>,
    pub category: Option<String>,
    pub target_tier: Option<String>,
    /// Open tickets the actor already holds in `category`.
    pub open_tickets: Option<u32>,
}

/// Authorization decision.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-check-response.ts"
)]
pub struct AccessCheckResponse {
    pub action: String,
    pub allowed: bool,
    pub is_staff: bool,
    /// Present when both `category` and `openTickets` were supplied.
    pub within_quota: Option<bool>,
}
