use chrono::Utc;
use proptest::prelude::*;
use serde_json::json;

use crate::{
    AccessMode, AccessQuery, ActionRule, Actor, ActorId, Capabilities, PermissionPolicy, Role,
    RoleId, Ticket, TicketAction, TicketPriority, TicketStatus,
};

fn role_id(value: &str) -> RoleId {
    RoleId::new(value).unwrap_or_else(|_| unreachable!())
}

fn actor_id(value: &str) -> ActorId {
    ActorId::new(value).unwrap_or_else(|_| unreachable!())
}

fn role(id: &str, name: &str, capabilities: Capabilities) -> Role {
    Role::new(role_id(id), name, capabilities)
}

fn member(id: &str, roles: Vec<Role>) -> Actor {
    Actor::new(actor_id(id), roles)
}

fn ticket(owner: &str, category: &str) -> Ticket {
    Ticket {
        id: format!("ticket-of-{owner}"),
        owner_actor_id: actor_id(owner),
        category: category.to_owned(),
        status: TicketStatus::Open,
        priority: TicketPriority::Normal,
        assigned_actor_id: None,
        created_at: Utc::now(),
        timeline: Vec::new(),
        webhook_message_id: None,
        webhook_sent: false,
    }
}

fn policy(document: serde_json::Value) -> PermissionPolicy {
    let parsed = serde_json::from_value::<PermissionPolicy>(document);
    assert!(parsed.is_ok());
    parsed.unwrap_or_default()
}

#[test]
fn staff_by_configured_role_only() {
    let policy = policy(json!({ "staffRoleIds": ["500"] }));
    let actor = member("1", vec![role("500", "Blue", Capabilities::NONE)]);
    let outsider = member("2", vec![role("501", "Blue", Capabilities::NONE)]);

    assert!(policy.is_staff(&actor));
    assert!(!policy.is_staff(&outsider));
}

#[test]
fn staff_by_capability_only() {
    let policy = PermissionPolicy::default();
    let actor = member("1", vec![role("600", "Blue", Capabilities::MODERATE_MEMBERS)]);
    let owner = member("2", Vec::new()).with_capabilities(Capabilities::ADMINISTRATOR);

    assert!(policy.is_staff(&actor));
    assert!(policy.is_staff(&owner));
}

#[test]
fn staff_by_role_name_only() {
    let policy = PermissionPolicy::default();
    let actor = member("1", vec![role("700", "Equipe de Suporte", Capabilities::NONE)]);

    assert!(policy.is_staff(&actor));
}

#[test]
fn plain_member_is_not_staff() {
    let policy = PermissionPolicy::default();
    let actor = member("1", vec![role("800", "Members", Capabilities::MANAGE_MESSAGES)]);

    assert!(!policy.is_staff(&actor));
}

#[test]
fn owner_only_close_rejects_staff_that_does_not_own_the_ticket() {
    let policy = policy(json!({
        "staffRoleIds": ["500"],
        "permissions": { "close": { "ownerOnly": true, "staffOnly": true } }
    }));
    let staff = member("9", vec![role("500", "Helpers", Capabilities::NONE)]);
    let owner = member("1", Vec::new());
    let ticket = ticket("1", "general");

    assert!(!policy.can_close(&staff, &ticket));
    assert!(policy.can_close(&owner, &ticket));
}

#[test]
fn staff_only_close_rejects_owner() {
    let policy = policy(json!({
        "staffRoleIds": ["500"],
        "permissions": { "close": { "staffOnly": true } }
    }));
    let staff = member("9", vec![role("500", "Helpers", Capabilities::NONE)]);
    let owner = member("1", Vec::new());
    let ticket = ticket("1", "general");

    assert!(policy.can_close(&staff, &ticket));
    assert!(!policy.can_close(&owner, &ticket));
}

#[test]
fn default_close_allows_owner_and_staff_only() {
    let policy = PermissionPolicy::default();
    let ticket = ticket("1", "general");

    assert!(policy.can_close(&member("1", Vec::new()), &ticket));
    assert!(policy.can_close(
        &member("9", vec![role("5", "Moderator", Capabilities::NONE)]),
        &ticket
    ));
    assert!(!policy.can_close(&member("2", Vec::new()), &ticket));
}

#[test]
fn allowlist_close_falls_through_to_allowlists() {
    let policy = policy(json!({
        "permissions": { "close": { "mode": "allowlist", "allowedActorIds": ["3"] } }
    }));
    let ticket = ticket("1", "general");

    assert!(policy.can_close(&member("3", Vec::new()), &ticket));
    assert!(!policy.can_close(&member("1", Vec::new()), &ticket));
}

#[test]
fn create_defaults_to_everyone() {
    let policy = PermissionPolicy::default();
    assert!(policy.can_create(&member("1", Vec::new()), None));
}

#[test]
fn create_in_allowlist_mode_accepts_roles_users_and_staff() {
    let mut policy = PermissionPolicy::default();
    policy.permissions.create = ActionRule {
        allowed_role_ids: [role_id("900")].into(),
        allowed_actor_ids: [actor_id("7")].into(),
        ..ActionRule::with_mode(AccessMode::Allowlist)
    };

    assert!(policy.can_create(&member("1", vec![role("900", "Verified", Capabilities::NONE)]), None));
    assert!(policy.can_create(&member("7", Vec::new()), None));
    assert!(policy.can_create(&member("8", vec![role("1", "Admin", Capabilities::NONE)]), None));
    assert!(!policy.can_create(&member("2", Vec::new()), None));
}

#[test]
fn category_allowed_roles_restrict_even_when_globally_allowed() {
    let policy = policy(json!({
        "categories": { "partnership": { "allowedRoleIds": ["42"] } }
    }));
    let partner = member("1", vec![role("42", "Partner", Capabilities::NONE)]);
    let stranger = member("2", Vec::new());

    assert!(policy.can_create(&partner, Some("partnership")));
    assert!(!policy.can_create(&stranger, Some("partnership")));
    assert!(policy.can_create(&stranger, Some("general")));
}

#[test]
fn claim_requires_staff_by_default() {
    let policy = PermissionPolicy::default();
    let ticket = ticket("1", "general");

    assert!(policy.can_claim(&member("9", vec![role("5", "Suporte", Capabilities::NONE)]), Some(&ticket)));
    assert!(!policy.can_claim(&member("2", Vec::new()), Some(&ticket)));
}

#[test]
fn category_staff_roles_replace_global_staff_check_for_claims() {
    let policy = policy(json!({
        "staffRoleIds": ["500"],
        "categories": { "billing": { "staffRoleIds": ["777"] } }
    }));
    let global_staff = member("9", vec![role("500", "Helpers", Capabilities::KICK_MEMBERS)]);
    let billing_staff = member("8", vec![role("777", "Billing", Capabilities::NONE)]);
    let billing_ticket = ticket("1", "billing");
    let general_ticket = ticket("1", "general");

    assert!(!policy.can_claim(&global_staff, Some(&billing_ticket)));
    assert!(policy.can_claim(&billing_staff, Some(&billing_ticket)));
    assert!(policy.can_claim(&global_staff, Some(&general_ticket)));
    assert!(!policy.can_claim(&billing_staff, Some(&general_ticket)));
}

#[test]
fn claim_allowlist_grants_non_staff() {
    let policy = policy(json!({
        "permissions": { "claim": { "allowedActorIds": ["4"] } }
    }));

    assert!(policy.can_claim(&member("4", Vec::new()), None));
}

#[test]
fn view_and_notes_are_staff_gated_with_allowlists() {
    let policy = policy(json!({
        "permissions": { "internalNotes": { "allowedRoleIds": ["33"] } }
    }));
    let trainee = member("1", vec![role("33", "Trainee", Capabilities::NONE)]);

    assert!(!policy.can_view_others(&trainee));
    assert!(policy.can_add_internal_notes(&trainee));
    assert!(policy.can_view_others(&member("2", vec![role("5", "Mods", Capabilities::NONE)])));
}

#[test]
fn manage_requires_administrative_capability_by_default() {
    let policy = PermissionPolicy::default();
    let moderator = member("1", vec![role("5", "Moderador", Capabilities::KICK_MEMBERS)]);
    let admin = member("2", vec![role("6", "Blue", Capabilities::MANAGE_GUILD)]);

    assert!(!policy.can_manage_settings(&moderator));
    assert!(policy.can_manage_settings(&admin));
    assert!(policy.can_delete_ticket(&moderator));
    assert!(policy.can_delete_ticket(&admin));
}

#[test]
fn delete_allowlist_mode_still_honors_admin_capability() {
    let policy = policy(json!({
        "permissions": { "delete": { "mode": "allowlist" } }
    }));

    assert!(!policy.can_delete_ticket(&member("1", vec![role("5", "Moderador", Capabilities::NONE)])));
    assert!(policy.can_delete_ticket(&member("2", Vec::new()).with_capabilities(Capabilities::ADMINISTRATOR)));
}

#[test]
fn escalation_respects_minimum_and_source_tiers() {
    let policy = policy(json!({
        "staffRoleIds": ["10", "20", "30"],
        "escalation": {
            "levels": [
                { "id": "10", "assignableFromTiers": "all" },
                { "id": "20", "assignableFromTiers": ["10"] },
                { "id": "30", "assignableFromTiers": ["20"] }
            ],
            "minimumTier": "10"
        }
    }));
    let tier_one = member("1", vec![role("10", "Tier 1", Capabilities::NONE)]);
    let tier_two_only = member("2", vec![role("20", "Tier 2", Capabilities::NONE)]);
    let member_only = member("3", Vec::new());

    assert!(policy.can_escalate(&tier_one, None));
    assert!(policy.can_escalate(&tier_one, Some(&role_id("20"))));
    assert!(!policy.can_escalate(&tier_one, Some(&role_id("30"))));
    assert!(!policy.can_escalate(&tier_one, Some(&role_id("99"))));
    assert!(!policy.can_escalate(&tier_two_only, None));
    assert!(!policy.can_escalate(&member_only, None));
}

#[test]
fn escalation_without_minimum_tier_only_needs_staff() {
    let policy = PermissionPolicy::default();
    assert!(policy.can_escalate(&member("1", vec![role("5", "Staff", Capabilities::NONE)]), None));
}

#[test]
fn escalation_allowlist_never_admits_non_staff() {
    let policy = policy(json!({
        "permissions": { "escalate": { "allowedActorIds": ["77"], "mode": "everyone" } }
    }));
    let listed_member = member("77", vec![role("1", "Members", Capabilities::NONE)]);

    assert!(!policy.is_staff(&listed_member));
    assert!(!policy.can_escalate(&listed_member, None));
}

#[test]
fn escalation_allowlist_narrows_staff() {
    let policy = policy(json!({
        "staffRoleIds": ["5"],
        "permissions": { "escalate": { "allowedRoleIds": ["6"] } }
    }));
    let senior = member("1", vec![
        role("5", "Helpers", Capabilities::NONE),
        role("6", "Senior", Capabilities::NONE),
    ]);
    let junior = member("2", vec![role("5", "Helpers", Capabilities::NONE)]);

    assert!(policy.can_escalate(&senior, None));
    assert!(!policy.can_escalate(&junior, None));
}

#[test]
fn ticket_quota_applies_per_category() {
    let policy = policy(json!({
        "categories": { "billing": { "maxTicketsPerActor": 1 } }
    }));

    assert!(policy.within_ticket_quota("billing", 0));
    assert!(!policy.within_ticket_quota("billing", 1));
    assert!(policy.within_ticket_quota("general", 50));
}

#[test]
fn evaluate_dispatches_by_action() {
    let policy = PermissionPolicy::default();
    let owner = member("1", Vec::new());
    let ticket = ticket("1", "general");

    assert!(policy.evaluate(&AccessQuery::new(TicketAction::Create, &owner)));
    assert!(policy.evaluate(&AccessQuery::new(TicketAction::Close, &owner).with_ticket(&ticket)));
    assert!(!policy.evaluate(&AccessQuery::new(TicketAction::Close, &owner)));
    assert!(!policy.evaluate(&AccessQuery::new(TicketAction::Manage, &owner)));
}

#[test]
fn cache_qualifier_separates_ticket_scoped_decisions() {
    let actor = member("1", Vec::new());
    let first = ticket("1", "general");
    let second = ticket("2", "general");

    let first_key = AccessQuery::new(TicketAction::Close, &actor)
        .with_ticket(&first)
        .cache_qualifier();
    let second_key = AccessQuery::new(TicketAction::Close, &actor)
        .with_ticket(&second)
        .cache_qualifier();

    assert_ne!(first_key, second_key);
    assert!(AccessQuery::new(TicketAction::Manage, &actor).cache_qualifier().is_none());
}

proptest! {
    #[test]
    fn is_staff_matches_its_three_disjuncts(
        configured in any::<bool>(),
        elevated in any::<bool>(),
        named in any::<bool>(),
    ) {
        let mut policy = PermissionPolicy::default();
        if configured {
            policy.staff_role_ids.insert(role_id("1"));
        }

        let capabilities = if elevated { Capabilities::BAN_MEMBERS } else { Capabilities::NONE };
        let name = if named { "Moderador" } else { "Members" };
        let actor = member("100", vec![
            role("1", "Blue", Capabilities::NONE),
            role("2", name, capabilities),
        ]);

        prop_assert_eq!(policy.is_staff(&actor), configured || elevated || named);
    }
}
