use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::{AutoConfigureReport, Role, StaffRoleMatch, StaffSuggestions, scan_roles};
use tracing::info;

use crate::AccessControlService;

/// Classifies tenant roles as staff and merges them into the policy.
#[derive(Clone)]
pub struct StaffDetectionService {
    access_control_service: AccessControlService,
}

impl StaffDetectionService {
    /// Creates a staff detection service writing through the access control service.
    #[must_use]
    pub fn new(access_control_service: AccessControlService) -> Self {
        Self {
            access_control_service,
        }
    }

    /// Returns the roles that classify as staff.
    #[must_use]
    pub fn scan(&self, roles: &[Role]) -> Vec<StaffRoleMatch> {
        scan_roles(roles)
    }

    /// Partitions detected roles against the tenant's configured staff roles.
    pub async fn suggest(&self, tenant_id: TenantId, roles: &[Role]) -> AppResult<StaffSuggestions> {
        let policy = self.access_control_service.policy(tenant_id).await?.policy;
        Ok(policy.suggest_staff_roles(roles))
    }

    /// Adds every detected staff role to the tenant policy.
    ///
    /// Running twice over the same roles leaves the policy unchanged.
    pub async fn auto_configure(
        &self,
        tenant_id: TenantId,
        roles: &[Role],
    ) -> AppResult<AutoConfigureReport> {
        let (_, report) = self
            .access_control_service
            .update_policy(tenant_id, |policy| Ok(policy.apply_staff_detection(roles)))
            .await?;

        info!(
            tenant_id = %tenant_id,
            detected = report.detected.len(),
            added = report.added.len(),
            total_staff_roles = report.total_staff_roles,
            "staff roles auto-configured"
        );

        Ok(report)
    }
}
