use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use ticketdesk_core::{AppError, AppResult, NonEmptyString};

use crate::Capabilities;

/// Platform identifier of an actor (member account).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(NonEmptyString);

impl ActorId {
    /// Creates a validated actor identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| AppError::Validation("actor id must not be empty".to_owned()))
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ActorId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Platform identifier of a tenant role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(NonEmptyString);

impl RoleId {
    /// Creates a validated role identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| AppError::Validation("role id must not be empty".to_owned()))
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Tenant role as reported by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Role identifier.
    pub id: RoleId,
    /// Display name shown in the tenant.
    pub name: String,
    /// Capability bits granted by the role.
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl Role {
    /// Creates a role snapshot.
    #[must_use]
    pub fn new(id: RoleId, name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            id,
            name: name.into(),
            capabilities,
        }
    }
}

/// Immutable snapshot of an actor taken for one authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: ActorId,
    roles: Vec<Role>,
    capabilities: Capabilities,
}

impl Actor {
    /// Creates an actor whose capabilities are the union of its role capabilities.
    #[must_use]
    pub fn new(id: ActorId, roles: Vec<Role>) -> Self {
        let capabilities = roles
            .iter()
            .fold(Capabilities::NONE, |accumulated, role| {
                accumulated | role.capabilities
            });

        Self {
            id,
            roles,
            capabilities,
        }
    }

    /// Adds capabilities not carried by any role (for example tenant ownership).
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities |= capabilities;
        self
    }

    /// Returns the actor identifier.
    #[must_use]
    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Returns the actor's roles in platform order.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns the resolved capability bitset.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Returns whether the actor holds the role.
    #[must_use]
    pub fn has_role(&self, role_id: &RoleId) -> bool {
        self.roles.iter().any(|role| &role.id == role_id)
    }

    /// Returns whether the actor holds any role yielded by `role_ids`.
    pub fn has_any_role<'a>(&self, mut role_ids: impl Iterator<Item = &'a RoleId>) -> bool {
        role_ids.any(|role_id| self.has_role(role_id))
    }
}
