use serde::{Deserialize, Serialize};
use ticketdesk_application::VersionedPolicy;
use ticketdesk_domain::PermissionPolicy;
use ts_rs::TS;

/// Tenant permission policy with its storage version.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/policy-response.ts"
)]
pub struct PolicyResponse {
    #[ts(type = "Record<string, unknown>")]
    pub policy: PermissionPolicy,
    /// Zero until the first write.
    #[ts(type = "number")]
    pub version: i64,
}

impl From<VersionedPolicy> for PolicyResponse {
    fn from(value: VersionedPolicy) -> Self {
        Self {
            policy: value.policy,
            version: value.version,
        }
    }
}

/// Incoming payload for a policy replacement.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/replace-policy-request.ts"
)]
pub struct ReplacePolicyRequest {
    #[ts(type = "Record<string, unknown>")]
    pub policy: PermissionPolicy,
    /// When set, the write fails with a conflict unless the stored version matches.
    #[ts(type = "number | null")]
    pub expected_version: Option<i64>,
}
