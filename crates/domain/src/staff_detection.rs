//! Staff role classification by capability bits and by role name.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{PermissionPolicy, Role, RoleId};

/// One category of staff role names.
#[derive(Debug, Clone, Copy)]
pub struct StaffNameCategory {
    /// Category reported as the matched pattern.
    pub category: &'static str,
    /// Name fragments matched anywhere in the normalized name.
    pub patterns: &'static [&'static str],
    /// Short forms matched only as a whole word, optionally pluralized.
    pub abbreviations: &'static [&'static str],
}

/// Staff name dictionary, in priority order.
///
/// A role name matching several categories is reported under the first one,
/// so "Admin Team" resolves to `administrador` rather than `staff`.
pub const STAFF_NAME_DICTIONARY: &[StaffNameCategory] = &[
    StaffNameCategory {
        category: "administrador",
        patterns: &["administrador", "administradora", "administrator", "admin"],
        abbreviations: &["adm"],
    },
    StaffNameCategory {
        category: "moderador",
        patterns: &["moderador", "moderadora", "moderator", "moderação", "moderation"],
        abbreviations: &["mod"],
    },
    StaffNameCategory {
        category: "suporte",
        patterns: &["suporte", "support", "atendente", "atendimento", "helper", "ajudante"],
        abbreviations: &[],
    },
    StaffNameCategory {
        category: "staff",
        patterns: &["staff", "equipe"],
        abbreviations: &[],
    },
    StaffNameCategory {
        category: "gerente",
        patterns: &["gerente", "manager", "gestor", "coordenador", "supervisor"],
        abbreviations: &[],
    },
    StaffNameCategory {
        category: "dono",
        patterns: &["dono", "owner", "fundador", "founder"],
        abbreviations: &["dona"],
    },
];

/// Names shorter than this never match by being contained in a pattern.
const MIN_REVERSE_MATCH_LEN: usize = 5;

/// Lowercases a role name and strips everything that is not alphanumeric.
#[must_use]
pub fn normalize_role_name(name: &str) -> String {
    name.chars()
        .filter(|character| character.is_alphanumeric() || *character == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns the dictionary category a role name belongs to, if any.
#[must_use]
pub fn match_staff_name(name: &str) -> Option<&'static str> {
    let normalized = normalize_role_name(name);
    if normalized.is_empty() {
        return None;
    }

    let name_length = normalized.chars().count();
    let words = name_words(name);

    STAFF_NAME_DICTIONARY
        .iter()
        .find(|entry| {
            let by_fragment = entry.patterns.iter().any(|pattern| {
                normalized.contains(*pattern)
                    || (name_length >= MIN_REVERSE_MATCH_LEN && pattern.contains(normalized.as_str()))
            });

            by_fragment
                || entry.abbreviations.iter().any(|abbreviation| {
                    words.iter().any(|word| {
                        word == abbreviation || word.strip_suffix('s') == Some(*abbreviation)
                    })
                })
        })
        .map(|entry| entry.category)
}

fn name_words(name: &str) -> Vec<String> {
    name.split(|character: char| !character.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Why a role was classified as staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionReason {
    /// The role carries an elevated capability.
    Permissions,
    /// The role name matched the staff dictionary.
    Name,
}

impl DetectionReason {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permissions => "permissions",
            Self::Name => "name",
        }
    }
}

/// One role classified as staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRoleMatch {
    /// Matched role.
    pub role_id: RoleId,
    /// Role display name at scan time.
    pub role_name: String,
    /// Classification reason.
    pub reason: DetectionReason,
    /// Dictionary category for name matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
}

/// Classifies one role; capability bits are checked before the name.
#[must_use]
pub fn classify_role(role: &Role) -> Option<StaffRoleMatch> {
    if role.capabilities.is_elevated() {
        return Some(StaffRoleMatch {
            role_id: role.id.clone(),
            role_name: role.name.clone(),
            reason: DetectionReason::Permissions,
            matched_pattern: None,
        });
    }

    match_staff_name(role.name.as_str()).map(|category| StaffRoleMatch {
        role_id: role.id.clone(),
        role_name: role.name.clone(),
        reason: DetectionReason::Name,
        matched_pattern: Some(category.to_owned()),
    })
}

/// Scans a tenant's roles and returns those classified as staff, in input order.
#[must_use]
pub fn scan_roles(roles: &[Role]) -> Vec<StaffRoleMatch> {
    roles.iter().filter_map(classify_role).collect()
}

/// Result of merging detected staff roles into a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoConfigureReport {
    /// Every role classified as staff.
    pub detected: Vec<StaffRoleMatch>,
    /// Role ids newly added to the policy.
    pub added: Vec<RoleId>,
    /// Staff role count after the merge.
    pub total_staff_roles: usize,
}

/// Detected roles split against the current policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSuggestions {
    /// Detected roles already in `staffRoleIds`.
    pub already_configured: Vec<StaffRoleMatch>,
    /// Detected roles not yet configured.
    pub suggested: Vec<StaffRoleMatch>,
}

impl PermissionPolicy {
    /// Unions detected staff roles into `staffRoleIds`.
    ///
    /// Re-running on an unchanged role set adds nothing.
    pub fn apply_staff_detection(&mut self, roles: &[Role]) -> AutoConfigureReport {
        let detected = scan_roles(roles);
        let mut added = Vec::new();

        for role_match in &detected {
            if self.staff_role_ids.insert(role_match.role_id.clone()) {
                added.push(role_match.role_id.clone());
            }
        }

        AutoConfigureReport {
            detected,
            added,
            total_staff_roles: self.staff_role_ids.len(),
        }
    }

    /// Partitions detected staff roles without mutating the policy.
    #[must_use]
    pub fn suggest_staff_roles(&self, roles: &[Role]) -> StaffSuggestions {
        let configured: &BTreeSet<RoleId> = &self.staff_role_ids;
        let (already_configured, suggested) = scan_roles(roles)
            .into_iter()
            .partition(|role_match| configured.contains(&role_match.role_id));

        StaffSuggestions {
            already_configured,
            suggested,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{DetectionReason, match_staff_name, normalize_role_name, scan_roles};
    use crate::{Capabilities, PermissionPolicy, Role, RoleId};

    fn role(id: &str, name: &str, capabilities: Capabilities) -> Role {
        Role::new(
            RoleId::new(id).unwrap_or_else(|_| unreachable!()),
            name,
            capabilities,
        )
    }

    #[test]
    fn portuguese_moderator_name_is_detected_by_name() {
        let matches = scan_roles(&[role("1", "Moderador de Chat 🛡️", Capabilities::NONE)]);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].reason, DetectionReason::Name);
        assert_eq!(matches[0].matched_pattern.as_deref(), Some("moderador"));
    }

    #[test]
    fn ban_capability_wins_over_name() {
        let matches = scan_roles(&[role("2", "Cool Kids", Capabilities::BAN_MEMBERS)]);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].reason, DetectionReason::Permissions);
        assert!(matches[0].matched_pattern.is_none());
    }

    #[test]
    fn unrelated_roles_are_excluded() {
        let matches = scan_roles(&[
            role("3", "@everyone", Capabilities::NONE),
            role("4", "Gamers", Capabilities::MANAGE_MESSAGES),
            role("5", "🎮", Capabilities::NONE),
        ]);

        assert!(matches.is_empty());
    }

    #[test]
    fn overlapping_categories_resolve_by_dictionary_order() {
        assert_eq!(match_staff_name("Admin Team"), Some("administrador"));
        assert_eq!(match_staff_name("Support Staff"), Some("suporte"));
    }

    #[test]
    fn abbreviations_match_only_as_whole_words() {
        assert_eq!(match_staff_name("Mod"), Some("moderador"));
        assert_eq!(match_staff_name("Mods 🔨"), Some("moderador"));
        assert_eq!(match_staff_name("ADM"), Some("administrador"));
        assert_eq!(match_staff_name("Mo"), None);
    }

    #[test]
    fn ordinary_names_sharing_short_fragments_are_not_staff() {
        for name in ["Donator", "Modern Art", "Admirers", "Tea", "Dream Team", "Dance Crew"] {
            assert_eq!(match_staff_name(name), None, "{name} classified as staff");
        }

        let matches = scan_roles(&[
            role("1", "Donator", Capabilities::NONE),
            role("2", "Modern Art", Capabilities::NONE),
        ]);
        assert!(matches.is_empty());
    }

    #[test]
    fn long_partial_names_match_by_reverse_containment() {
        assert_eq!(match_staff_name("Modera"), Some("moderador"));
        assert_eq!(match_staff_name("Supor"), Some("suporte"));
    }

    #[test]
    fn normalization_keeps_accented_letters() {
        assert_eq!(normalize_role_name("Moderação ⚔ Geral"), "moderaçãogeral");
        assert_eq!(match_staff_name("Equipe de Moderação"), Some("moderador"));
    }

    #[test]
    fn auto_configure_reports_added_roles_once() {
        let roles = vec![
            role("1", "Moderador", Capabilities::NONE),
            role("2", "Admins", Capabilities::ADMINISTRATOR),
            role("3", "Members", Capabilities::NONE),
        ];
        let mut policy = PermissionPolicy::default();

        let first = policy.apply_staff_detection(&roles);
        assert_eq!(first.detected.len(), 2);
        assert_eq!(first.added.len(), 2);
        assert_eq!(first.total_staff_roles, 2);

        let second = policy.apply_staff_detection(&roles);
        assert!(second.added.is_empty());
        assert_eq!(second.total_staff_roles, 2);
    }

    #[test]
    fn suggestions_split_configured_and_new_roles() {
        let roles = vec![
            role("1", "Moderador", Capabilities::NONE),
            role("2", "Suporte", Capabilities::NONE),
        ];
        let mut policy = PermissionPolicy::default();
        policy
            .staff_role_ids
            .insert(RoleId::new("1").unwrap_or_else(|_| unreachable!()));

        let suggestions = policy.suggest_staff_roles(&roles);
        assert_eq!(suggestions.already_configured.len(), 1);
        assert_eq!(suggestions.suggested.len(), 1);
        assert_eq!(suggestions.suggested[0].role_id.as_str(), "2");
        assert_eq!(policy.staff_role_ids.len(), 1);
    }

    fn arbitrary_role() -> impl Strategy<Value = Role> {
        (
            "[0-9]{1,6}",
            prop_oneof![
                Just("Moderador".to_owned()),
                Just("Members".to_owned()),
                Just("Support Crew".to_owned()),
                "[a-zA-Z ]{0,12}",
            ],
            prop_oneof![
                Just(Capabilities::NONE),
                Just(Capabilities::KICK_MEMBERS),
                Just(Capabilities::MANAGE_MESSAGES),
            ],
        )
            .prop_map(|(id, name, capabilities)| {
                Role::new(
                    RoleId::new(id).unwrap_or_else(|_| unreachable!()),
                    name,
                    capabilities,
                )
            })
    }

    proptest! {
        #[test]
        fn auto_configure_is_idempotent(roles in prop::collection::vec(arbitrary_role(), 0..12)) {
            let mut policy = PermissionPolicy::default();
            let first = policy.apply_staff_detection(&roles);
            let after_first = policy.staff_role_ids.clone();

            let second = policy.apply_staff_detection(&roles);

            prop_assert!(second.added.is_empty());
            prop_assert_eq!(&policy.staff_role_ids, &after_first);
            prop_assert_eq!(first.total_staff_roles, second.total_staff_roles);
        }
    }
}
