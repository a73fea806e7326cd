use ticketdesk_domain::{AutoConfigureReport, StaffRoleMatch, StaffSuggestions};

use super::types::{AutoConfigureResponse, StaffRoleMatchResponse, StaffSuggestionsResponse};

impl From<StaffRoleMatch> for StaffRoleMatchResponse {
    fn from(value: StaffRoleMatch) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            role_name: value.role_name,
            reason: value.reason.as_str().to_owned(),
            matched_pattern: value.matched_pattern,
        }
    }
}

impl From<StaffSuggestions> for StaffSuggestionsResponse {
    fn from(value: StaffSuggestions) -> Self {
        Self {
            already_configured: value
                .already_configured
                .into_iter()
                .map(StaffRoleMatchResponse::from)
                .collect(),
            suggested: value
                .suggested
                .into_iter()
                .map(StaffRoleMatchResponse::from)
                .collect(),
        }
    }
}

impl From<AutoConfigureReport> for AutoConfigureResponse {
    fn from(value: AutoConfigureReport) -> Self {
        Self {
            detected: value
                .detected
                .into_iter()
                .map(StaffRoleMatchResponse::from)
                .collect(),
            added: value
                .added
                .into_iter()
                .map(|role_id| role_id.to_string())
                .collect(),
            total_staff_roles: value.total_staff_roles,
        }
    }
}
