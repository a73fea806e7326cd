//! Total decision functions over a tenant's [`PermissionPolicy`].

use crate::staff_detection::match_staff_name;
use crate::{AccessMode, ActionRule, Actor, PermissionPolicy, RoleId, Ticket, TicketAction, TierScope};

/// One authorization question.
#[derive(Debug, Clone, Copy)]
pub struct AccessQuery<'a> {
    /// Action being attempted.
    pub action: TicketAction,
    /// Actor attempting the action.
    pub actor: &'a Actor,
    /// Ticket acted upon, when the action targets one.
    pub ticket: Option<&'a Ticket>,
    /// Category for ticket creation.
    pub category: Option<&'a str>,
    /// Target tier for escalation.
    pub target_tier: Option<&'a RoleId>,
}

impl<'a> AccessQuery<'a> {
    /// Creates a query with no ticket, category or tier.
    #[must_use]
    pub fn new(action: TicketAction, actor: &'a Actor) -> Self {
        Self {
            action,
            actor,
            ticket: None,
            category: None,
            target_tier: None,
        }
    }

    /// Sets the ticket acted upon.
    #[must_use]
    pub fn with_ticket(mut self, ticket: &'a Ticket) -> Self {
        self.ticket = Some(ticket);
        self
    }

    /// Sets the creation category.
    #[must_use]
    pub fn with_category(mut self, category: &'a str) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the escalation target tier.
    #[must_use]
    pub fn with_target_tier(mut self, tier: &'a RoleId) -> Self {
        self.target_tier = Some(tier);
        self
    }

    /// Returns the qualifier that makes a cached decision specific to this query.
    #[must_use]
    pub fn cache_qualifier(&self) -> Option<String> {
        match self.action {
            TicketAction::Create => self.category.map(|category| format!("category:{category}")),
            TicketAction::Claim | TicketAction::Close => {
                self.ticket.map(|ticket| format!("ticket:{}", ticket.id))
            }
            TicketAction::Escalate => self.target_tier.map(|tier| format!("tier:{tier}")),
            TicketAction::ViewOthers
            | TicketAction::InternalNotes
            | TicketAction::Delete
            | TicketAction::Manage => None,
        }
    }
}

impl PermissionPolicy {
    /// Answers an access query.
    #[must_use]
    pub fn evaluate(&self, query: &AccessQuery<'_>) -> bool {
        let actor = query.actor;
        match query.action {
            TicketAction::Create => self.can_create(actor, query.category),
            TicketAction::Claim => self.can_claim(actor, query.ticket),
            TicketAction::Close => query.ticket.is_some_and(|ticket| self.can_close(actor, ticket)),
            TicketAction::ViewOthers => self.can_view_others(actor),
            TicketAction::InternalNotes => self.can_add_internal_notes(actor),
            TicketAction::Escalate => self.can_escalate(actor, query.target_tier),
            TicketAction::Delete => self.can_delete_ticket(actor),
            TicketAction::Manage => self.can_manage_settings(actor),
        }
    }

    /// Returns whether the actor counts as staff.
    ///
    /// Any of: a configured staff role, an elevated capability, or a role
    /// name matching the staff dictionary.
    #[must_use]
    pub fn is_staff(&self, actor: &Actor) -> bool {
        actor.has_any_role(self.staff_role_ids.iter())
            || actor.capabilities().is_elevated()
            || actor
                .roles()
                .iter()
                .any(|role| match_staff_name(role.name.as_str()).is_some())
    }

    /// Returns whether the actor may open a ticket in `category`.
    ///
    /// A category declaring `allowedRoleIds` restricts the result further; it
    /// never grants on its own.
    #[must_use]
    pub fn can_create(&self, actor: &Actor, category: Option<&str>) -> bool {
        let rule = &self.permissions.create;
        let mode = rule.effective_mode(TicketAction::Create);
        let granted = mode == AccessMode::Everyone
            || is_allowlisted(rule, actor)
            || self.is_staff(actor)
            || (mode == AccessMode::AdminOnly && actor.capabilities().is_administrative());

        if !granted {
            return false;
        }

        match category.and_then(|name| self.category(name)) {
            Some(category) if !category.allowed_role_ids.is_empty() => {
                actor.has_any_role(category.allowed_role_ids.iter())
            }
            _ => true,
        }
    }

    /// Returns whether the actor may claim the ticket.
    ///
    /// Category staff roles replace the global staff check for that category.
    #[must_use]
    pub fn can_claim(&self, actor: &Actor, ticket: Option<&Ticket>) -> bool {
        let rule = &self.permissions.claim;
        let category_staff = ticket
            .and_then(|ticket| self.category(ticket.category.as_str()))
            .map(|category| &category.staff_role_ids)
            .filter(|role_ids| !role_ids.is_empty());

        let is_staff = || match category_staff {
            Some(role_ids) => actor.has_any_role(role_ids.iter()),
            None => self.is_staff(actor),
        };

        mode_grants(rule.effective_mode(TicketAction::Claim), actor, ticket, is_staff)
            || is_allowlisted(rule, actor)
    }

    /// Returns whether the actor may close the ticket.
    ///
    /// Precedence is first-match: owner-only, staff-only, staff-and-owner;
    /// allowlists only apply to the remaining modes.
    #[must_use]
    pub fn can_close(&self, actor: &Actor, ticket: &Ticket) -> bool {
        let rule = &self.permissions.close;
        let is_owner = ticket.is_owned_by(actor.id());

        match rule.effective_mode(TicketAction::Close) {
            AccessMode::OwnerOnly => is_owner,
            AccessMode::StaffOnly => self.is_staff(actor),
            AccessMode::StaffAndOwner => is_owner || self.is_staff(actor),
            AccessMode::Everyone => true,
            AccessMode::AdminOnly => {
                actor.capabilities().is_administrative() || is_allowlisted(rule, actor)
            }
            AccessMode::Allowlist => is_allowlisted(rule, actor),
        }
    }

    /// Returns whether the actor may view tickets opened by others.
    #[must_use]
    pub fn can_view_others(&self, actor: &Actor) -> bool {
        self.staff_gated(TicketAction::ViewOthers, actor)
    }

    /// Returns whether the actor may add internal notes.
    #[must_use]
    pub fn can_add_internal_notes(&self, actor: &Actor) -> bool {
        self.staff_gated(TicketAction::InternalNotes, actor)
    }

    /// Returns whether the actor may delete tickets.
    #[must_use]
    pub fn can_delete_ticket(&self, actor: &Actor) -> bool {
        actor.capabilities().is_administrative() || self.staff_gated(TicketAction::Delete, actor)
    }

    /// Returns whether the actor may change ticket settings.
    #[must_use]
    pub fn can_manage_settings(&self, actor: &Actor) -> bool {
        actor.capabilities().is_administrative() || self.staff_gated(TicketAction::Manage, actor)
    }

    /// Returns whether the actor may escalate, optionally into `to_tier`.
    ///
    /// Staff is always required. A configured allowlist narrows the staff
    /// who may escalate; it never admits non-staff.
    #[must_use]
    pub fn can_escalate(&self, actor: &Actor, to_tier: Option<&RoleId>) -> bool {
        if !self.is_staff(actor) {
            return false;
        }

        let rule = &self.permissions.escalate;
        let restricted = !rule.allowed_actor_ids.is_empty() || !rule.allowed_role_ids.is_empty();
        if restricted && !is_allowlisted(rule, actor) {
            return false;
        }

        if let Some(minimum_tier) = &self.escalation.minimum_tier {
            if !actor.has_role(minimum_tier) {
                return false;
            }
        }

        let Some(to_tier) = to_tier else {
            return true;
        };

        match self.escalation.tier(to_tier) {
            Some(tier) => match &tier.assignable_from_tiers {
                TierScope::All => true,
                TierScope::Tiers(sources) => actor.has_any_role(sources.iter()),
            },
            None => false,
        }
    }

    /// Returns whether an actor with `open_tickets` open tickets in
    /// `category` may open another one.
    #[must_use]
    pub fn within_ticket_quota(&self, category: &str, open_tickets: u32) -> bool {
        self.category(category)
            .and_then(|category| category.max_tickets_per_actor)
            .is_none_or(|limit| open_tickets < limit)
    }

    fn staff_gated(&self, action: TicketAction, actor: &Actor) -> bool {
        let rule = self.permissions.rule(action);
        mode_grants(rule.effective_mode(action), actor, None, || self.is_staff(actor))
            || is_allowlisted(rule, actor)
    }
}

fn mode_grants(
    mode: AccessMode,
    actor: &Actor,
    ticket: Option<&Ticket>,
    is_staff: impl FnOnce() -> bool,
) -> bool {
    let is_owner = || ticket.is_some_and(|ticket| ticket.is_owned_by(actor.id()));

    match mode {
        AccessMode::Everyone => true,
        AccessMode::StaffOnly => is_staff(),
        AccessMode::OwnerOnly => is_owner(),
        AccessMode::StaffAndOwner => is_owner() || is_staff(),
        AccessMode::AdminOnly => actor.capabilities().is_administrative(),
        AccessMode::Allowlist => false,
    }
}

fn is_allowlisted(rule: &ActionRule, actor: &Actor) -> bool {
    rule.allowed_actor_ids.contains(actor.id()) || actor.has_any_role(rule.allowed_role_ids.iter())
}

#[cfg(test)]
mod tests;
