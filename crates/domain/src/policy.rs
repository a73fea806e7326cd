use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ticketdesk_core::{AppError, AppResult};

use crate::{ActorId, RateLimitSettings, RoleId};

/// Ticket actions gated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TicketAction {
    /// Open a new ticket.
    Create,
    /// Claim a ticket as the handling staff member.
    Claim,
    /// Close a ticket.
    Close,
    /// View tickets opened by other actors.
    ViewOthers,
    /// Add staff-only notes.
    InternalNotes,
    /// Move a ticket to another escalation tier.
    Escalate,
    /// Permanently delete a ticket.
    Delete,
    /// Change tenant ticket settings.
    Manage,
}

impl TicketAction {
    /// Returns the policy document key for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Claim => "claim",
            Self::Close => "close",
            Self::ViewOthers => "viewOthers",
            Self::InternalNotes => "internalNotes",
            Self::Escalate => "escalate",
            Self::Delete => "delete",
            Self::Manage => "manage",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[TicketAction] = &[
            TicketAction::Create,
            TicketAction::Claim,
            TicketAction::Close,
            TicketAction::ViewOthers,
            TicketAction::InternalNotes,
            TicketAction::Escalate,
            TicketAction::Delete,
            TicketAction::Manage,
        ];

        ALL
    }

    /// Returns the mode applied when the policy does not configure one.
    ///
    /// Create and close default to their most permissive branch.
    #[must_use]
    pub fn default_mode(&self) -> AccessMode {
        match self {
            Self::Create => AccessMode::Everyone,
            Self::Close => AccessMode::StaffAndOwner,
            Self::Manage => AccessMode::AdminOnly,
            Self::Claim
            | Self::ViewOthers
            | Self::InternalNotes
            | Self::Escalate
            | Self::Delete => AccessMode::StaffOnly,
        }
    }

    /// Returns a human-readable verb phrase for rejection messages.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Create => "open tickets",
            Self::Claim => "claim this ticket",
            Self::Close => "close this ticket",
            Self::ViewOthers => "view other members' tickets",
            Self::InternalNotes => "add internal notes",
            Self::Escalate => "escalate this ticket",
            Self::Delete => "delete tickets",
            Self::Manage => "manage ticket settings",
        }
    }
}

impl FromStr for TicketAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| AppError::Validation(format!("unknown ticket action '{value}'")))
    }
}

/// Base grant mode for one action rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessMode {
    /// Every actor is allowed.
    Everyone,
    /// Only staff actors.
    StaffOnly,
    /// Only the ticket owner.
    OwnerOnly,
    /// The ticket owner or any staff actor.
    StaffAndOwner,
    /// Only actors holding an administrative capability.
    AdminOnly,
    /// Only explicitly allowlisted roles and actors.
    Allowlist,
}

/// Per-action rule stored in the policy document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionRule {
    /// Configured base mode; `None` falls back to the action default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<AccessMode>,
    /// Close-only flag; wins over every other close setting.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub owner_only: bool,
    /// Close-only flag; wins over `mode`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub staff_only: bool,
    /// Roles granted the action regardless of mode.
    pub allowed_role_ids: BTreeSet<RoleId>,
    /// Actors granted the action regardless of mode.
    pub allowed_actor_ids: BTreeSet<ActorId>,
}

impl ActionRule {
    /// Creates a rule with an explicit mode and empty allowlists.
    #[must_use]
    pub fn with_mode(mode: AccessMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    /// Resolves the effective mode for `action`.
    ///
    /// Flags are checked before `mode`: `ownerOnly`, then `staffOnly`.
    #[must_use]
    pub fn effective_mode(&self, action: TicketAction) -> AccessMode {
        if self.owner_only {
            return AccessMode::OwnerOnly;
        }
        if self.staff_only {
            return AccessMode::StaffOnly;
        }

        self.mode.unwrap_or_else(|| action.default_mode())
    }
}

/// Per-action rules of one tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionPermissions {
    /// Rule for opening tickets.
    pub create: ActionRule,
    /// Rule for claiming tickets.
    pub claim: ActionRule,
    /// Rule for closing tickets.
    pub close: ActionRule,
    /// Rule for viewing other actors' tickets.
    pub view_others: ActionRule,
    /// Rule for internal notes.
    pub internal_notes: ActionRule,
    /// Rule for escalation.
    pub escalate: ActionRule,
    /// Rule for deletion.
    pub delete: ActionRule,
    /// Rule for settings management.
    pub manage: ActionRule,
}

impl ActionPermissions {
    /// Returns the rule configured for `action`.
    #[must_use]
    pub fn rule(&self, action: TicketAction) -> &ActionRule {
        match action {
            TicketAction::Create => &self.create,
            TicketAction::Claim => &self.claim,
            TicketAction::Close => &self.close,
            TicketAction::ViewOthers => &self.view_others,
            TicketAction::InternalNotes => &self.internal_notes,
            TicketAction::Escalate => &self.escalate,
            TicketAction::Delete => &self.delete,
            TicketAction::Manage => &self.manage,
        }
    }

    /// Returns a mutable rule for `action`.
    pub fn rule_mut(&mut self, action: TicketAction) -> &mut ActionRule {
        match action {
            TicketAction::Create => &mut self.create,
            TicketAction::Claim => &mut self.claim,
            TicketAction::Close => &mut self.close,
            TicketAction::ViewOthers => &mut self.view_others,
            TicketAction::InternalNotes => &mut self.internal_notes,
            TicketAction::Escalate => &mut self.escalate,
            TicketAction::Delete => &mut self.delete,
            TicketAction::Manage => &mut self.manage,
        }
    }
}

/// Category-specific restrictions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryOverride {
    /// When non-empty, creating in this category additionally requires one of these roles.
    pub allowed_role_ids: BTreeSet<RoleId>,
    /// When non-empty, replaces the global staff check for claims in this category.
    pub staff_role_ids: BTreeSet<RoleId>,
    /// Maximum open tickets per actor in this category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tickets_per_actor: Option<u32>,
}

/// Tiers a ticket may be escalated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TierScopeRepr", into = "TierScopeRepr")]
pub enum TierScope {
    /// Any tier may assign.
    All,
    /// Only holders of one of these tiers may assign.
    Tiers(BTreeSet<RoleId>),
}

impl Default for TierScope {
    fn default() -> Self {
        Self::Tiers(BTreeSet::new())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TierScopeRepr {
    Keyword(String),
    Tiers(BTreeSet<RoleId>),
}

impl TryFrom<TierScopeRepr> for TierScope {
    type Error = AppError;

    fn try_from(value: TierScopeRepr) -> Result<Self, Self::Error> {
        match value {
            TierScopeRepr::Keyword(keyword) if keyword.eq_ignore_ascii_case("all") => Ok(Self::All),
            TierScopeRepr::Keyword(keyword) => Err(AppError::Validation(format!(
                "assignableFromTiers must be \"all\" or a list of tier ids, got '{keyword}'"
            ))),
            TierScopeRepr::Tiers(tiers) => Ok(Self::Tiers(tiers)),
        }
    }
}

impl From<TierScope> for TierScopeRepr {
    fn from(value: TierScope) -> Self {
        match value {
            TierScope::All => Self::Keyword("all".to_owned()),
            TierScope::Tiers(tiers) => Self::Tiers(tiers),
        }
    }
}

/// One escalation level, mapped 1:1 onto a tenant role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationTier {
    /// Role that represents the tier.
    pub id: RoleId,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tiers whose holders may escalate tickets into this tier.
    #[serde(default)]
    pub assignable_from_tiers: TierScope,
}

/// Escalation ladder of one tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EscalationSettings {
    /// Ordered tiers, lowest first.
    pub levels: Vec<EscalationTier>,
    /// Tier an actor must hold before escalating at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_tier: Option<RoleId>,
}

impl EscalationSettings {
    /// Finds a tier by id.
    #[must_use]
    pub fn tier(&self, tier_id: &RoleId) -> Option<&EscalationTier> {
        self.levels.iter().find(|tier| &tier.id == tier_id)
    }
}

/// Per-tenant access policy document.
///
/// Persisted wholesale as one JSON document; every field defaults so a
/// missing or partial document evaluates to the permissive defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionPolicy {
    /// Roles classified as staff.
    pub staff_role_ids: BTreeSet<RoleId>,
    /// Per-action rules.
    pub permissions: ActionPermissions,
    /// Category overrides keyed by category name.
    pub categories: BTreeMap<String, CategoryOverride>,
    /// Escalation ladder.
    pub escalation: EscalationSettings,
    /// Ticket creation throttling.
    pub rate_limiting: RateLimitSettings,
}

impl PermissionPolicy {
    /// Returns the override for `category`, if declared.
    #[must_use]
    pub fn category(&self, category: &str) -> Option<&CategoryOverride> {
        self.categories.get(category)
    }

    /// Validates internal references before the document is stored.
    pub fn validate(&self) -> AppResult<()> {
        self.rate_limiting.validate()?;

        let mut seen = BTreeSet::new();
        for tier in &self.escalation.levels {
            if !seen.insert(&tier.id) {
                return Err(AppError::Validation(format!(
                    "escalation tier '{}' is declared more than once",
                    tier.id
                )));
            }
        }

        for tier in &self.escalation.levels {
            if let TierScope::Tiers(sources) = &tier.assignable_from_tiers {
                if let Some(unknown) = sources.iter().find(|source| !seen.contains(source)) {
                    return Err(AppError::Validation(format!(
                        "escalation tier '{}' references unknown tier '{unknown}'",
                        tier.id
                    )));
                }
            }
        }

        if let Some(minimum_tier) = &self.escalation.minimum_tier {
            if !seen.contains(minimum_tier) {
                return Err(AppError::Validation(format!(
                    "minimum escalation tier '{minimum_tier}' is not a configured tier"
                )));
            }
        }

        for (name, category) in &self.categories {
            if name.trim().is_empty() {
                return Err(AppError::Validation(
                    "category names must not be empty".to_owned(),
                ));
            }
            if category.max_tickets_per_actor == Some(0) {
                return Err(AppError::Validation(format!(
                    "category '{name}' maxTicketsPerActor must be greater than zero"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::{AccessMode, PermissionPolicy, TicketAction, TierScope};

    #[test]
    fn empty_document_yields_permissive_defaults() {
        let policy = serde_json::from_value::<PermissionPolicy>(json!({}));
        assert!(policy.is_ok());
        let policy = policy.unwrap_or_default();

        assert_eq!(
            policy.permissions.create.effective_mode(TicketAction::Create),
            AccessMode::Everyone
        );
        assert_eq!(
            policy.permissions.close.effective_mode(TicketAction::Close),
            AccessMode::StaffAndOwner
        );
        assert!(policy.rate_limiting.enabled);
    }

    #[test]
    fn owner_only_flag_wins_over_staff_only_and_mode() {
        let policy = serde_json::from_value::<PermissionPolicy>(json!({
            "permissions": {
                "close": { "mode": "staffOnly", "ownerOnly": true, "staffOnly": true }
            }
        }))
        .unwrap_or_default();

        assert_eq!(
            policy.permissions.close.effective_mode(TicketAction::Close),
            AccessMode::OwnerOnly
        );
    }

    #[test]
    fn tier_scope_accepts_all_keyword_and_lists() {
        let policy = serde_json::from_value::<PermissionPolicy>(json!({
            "escalation": {
                "levels": [
                    { "id": "10", "assignableFromTiers": "all" },
                    { "id": "20", "assignableFromTiers": ["10"] }
                ]
            }
        }));
        assert!(policy.is_ok());
        let policy = policy.unwrap_or_default();

        assert_eq!(policy.escalation.levels[0].assignable_from_tiers, TierScope::All);
        assert!(matches!(
            &policy.escalation.levels[1].assignable_from_tiers,
            TierScope::Tiers(tiers) if tiers.len() == 1
        ));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn tier_scope_rejects_unknown_keyword() {
        let policy = serde_json::from_value::<PermissionPolicy>(json!({
            "escalation": { "levels": [{ "id": "10", "assignableFromTiers": "some" }] }
        }));
        assert!(policy.is_err());
    }

    #[test]
    fn validate_rejects_dangling_tier_references() {
        let policy = serde_json::from_value::<PermissionPolicy>(json!({
            "escalation": {
                "levels": [{ "id": "20", "assignableFromTiers": ["10"] }],
                "minimumTier": "20"
            }
        }))
        .unwrap_or_default();

        assert!(policy.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_ticket_quota() {
        let policy = serde_json::from_value::<PermissionPolicy>(json!({
            "categories": { "billing": { "maxTicketsPerActor": 0 } }
        }))
        .unwrap_or_default();

        assert!(policy.validate().is_err());
    }

    #[test]
    fn ticket_action_parses_document_keys() {
        for action in TicketAction::all() {
            let parsed = TicketAction::from_str(action.as_str());
            assert!(parsed.is_ok());
        }
        assert!(TicketAction::from_str("transfer").is_err());
    }
}
