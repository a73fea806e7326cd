use serde::{Deserialize, Serialize};
use ticketdesk_domain::RateLimitDecision;
use ts_rs::TS;

/// Actor whose ticket creation is throttled.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/rate-limit-request.ts"
)]
pub struct RateLimitRequest {
    pub actor_id: String,
}

/// Rate-limit decision.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/rate-limit-check-response.ts"
)]
pub struct RateLimitCheckResponse {
    pub allowed: bool,
    /// `cooldown`, `hourly_limit` or `daily_limit` when rejected.
    pub reason: Option<String>,
    #[ts(type = "number | null")]
    pub remaining_seconds: Option<i64>,
}

impl From<RateLimitDecision> for RateLimitCheckResponse {
    fn from(value: RateLimitDecision) -> Self {
        match value {
            RateLimitDecision::Allowed => Self {
                allowed: true,
                reason: None,
                remaining_seconds: None,
            },
            RateLimitDecision::Rejected {
                reason,
                remaining_seconds,
            } => Self {
                allowed: false,
                reason: Some(reason.as_str().to_owned()),
                remaining_seconds: Some(remaining_seconds),
            },
        }
    }
}

/// Result of an administrative counter reset.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/rate-limit-reset-response.ts"
)]
pub struct RateLimitResetResponse {
    /// Whether any state was tracked for the actor.
    pub reset: bool,
}
