use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dto::RoleRequest;

/// The tenant's full role list.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/staff-roles-request.ts"
)]
pub struct StaffRolesRequest {
    pub roles: Vec<RoleRequest>,
}

/// One role classified as staff.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/staff-role-match-response.ts"
)]
pub struct StaffRoleMatchResponse {
    pub role_id: String,
    pub role_name: String,
    /// `permissions` or `name`.
    pub reason: String,
    pub matched_pattern: Option<String>,
}

/// Dry-run split of detected staff roles.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/staff-suggestions-response.ts"
)]
pub struct StaffSuggestionsResponse {
    pub already_configured: Vec<StaffRoleMatchResponse>,
    pub suggested: Vec<StaffRoleMatchResponse>,
}

/// Result of merging detected staff roles into the policy.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auto-configure-response.ts"
)]
pub struct AutoConfigureResponse {
    pub detected: Vec<StaffRoleMatchResponse>,
    pub added: Vec<String>,
    pub total_staff_roles: usize,
}
