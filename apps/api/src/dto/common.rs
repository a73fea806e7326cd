use serde::{Deserialize, Serialize};
use ticketdesk_core::AppResult;
use ticketdesk_domain::{Actor, ActorId, Capabilities, Role, RoleId};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// One platform role as reported by the chat platform.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-request.ts"
)]
pub struct RoleRequest {
    pub id: String,
    pub name: String,
    /// Raw platform permission bits.
    #[serde(default)]
    #[ts(type = "number")]
    pub capabilities: u64,
}

impl RoleRequest {
    /// Converts the payload into a domain role.
    pub fn into_role(self) -> AppResult<Role> {
        Ok(Role::new(
            RoleId::new(self.id)?,
            self.name,
            Capabilities::from_bits_retain(self.capabilities),
        ))
    }
}

/// Actor attempting a ticket action.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/actor-request.ts"
)]
pub struct ActorRequest {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<RoleRequest>,
    /// Capabilities held outside any role, such as tenant ownership.
    #[serde(default)]
    #[ts(type = "number")]
    pub extra_capabilities: u64,
}

impl ActorRequest {
    /// Converts the payload into a domain actor.
    pub fn into_actor(self) -> AppResult<Actor> {
        let roles = into_roles(self.roles)?;
        Ok(Actor::new(ActorId::new(self.id)?, roles)
            .with_capabilities(Capabilities::from_bits_retain(self.extra_capabilities)))
    }
}

/// Converts role payloads, failing on the first invalid id.
pub fn into_roles(roles: Vec<RoleRequest>) -> AppResult<Vec<Role>> {
    roles.into_iter().map(RoleRequest::into_role).collect()
}
