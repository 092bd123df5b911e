//! Role-based access decisions.
//!
//! - No IO
//! - No panics
//! - A missing identity is always denied

use serde::Serialize;

use crate::{Identity, Role};

/// Whether `identity` meets the `required` role.
///
/// Monotonic in the requirement: access to a role implies access to every
/// lower-ranked role.
pub fn can_access(identity: Option<&Identity>, required: Role) -> bool {
    let granted = identity.is_some_and(|id| id.role.is_equal_or_higher_than(required));
    tracing::debug!(
        user_id = identity.map(|id| id.id.get()),
        required = %required,
        granted,
        "access check"
    );
    granted
}

/// Exact role match.
pub fn has_role(identity: Option<&Identity>, role: Role) -> bool {
    identity.is_some_and(|id| id.role == role)
}

/// Exact match against any of `roles`.
pub fn has_any_role(identity: Option<&Identity>, roles: &[Role]) -> bool {
    identity.is_some_and(|id| roles.contains(&id.role))
}

/// Create and edit accounts from the user list (admins and superadmins).
pub fn can_manage_users(identity: Option<&Identity>) -> bool {
    identity.is_some_and(|id| id.role.is_admin())
}

/// Delete accounts (superadmin only).
pub fn can_delete_users(identity: Option<&Identity>) -> bool {
    has_role(identity, Role::Superadmin)
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDenial {
    /// Nobody is signed in.
    MissingIdentity,
    /// Signed in, but the role ranks below the requirement.
    InsufficientRank,
}

/// Auditable account of an access decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessExplanation {
    pub required_role: Role,
    pub granted: bool,
    pub reason: String,
    pub denial: Option<AccessDenial>,
}

/// Same verdict as [`can_access`], with the reason spelled out.
pub fn explain_access(identity: Option<&Identity>, required: Role) -> AccessExplanation {
    let Some(identity) = identity else {
        return AccessExplanation {
            required_role: required,
            granted: false,
            reason: format!("No signed-in user; role '{required}' is required"),
            denial: Some(AccessDenial::MissingIdentity),
        };
    };

    if identity.role.is_equal_or_higher_than(required) {
        AccessExplanation {
            required_role: required,
            granted: true,
            reason: format!(
                "Role '{}' (rank {}) meets required role '{}' (rank {})",
                identity.role,
                identity.role.rank(),
                required,
                required.rank()
            ),
            denial: None,
        }
    } else {
        AccessExplanation {
            required_role: required,
            granted: false,
            reason: format!(
                "Role '{}' (rank {}) is below required role '{}' (rank {})",
                identity.role,
                identity.role.rank(),
                required,
                required.rank()
            ),
            denial: Some(AccessDenial::InsufficientRank),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_console_core::UserId;
    use proptest::prelude::*;

    fn identity(id: i64, role: Role) -> Identity {
        Identity::new(UserId::new(id), role)
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    #[test]
    fn no_identity_is_never_granted() {
        for role in Role::ALL {
            assert!(!can_access(None, role));
            assert!(!has_role(None, role));
        }
        assert!(!has_any_role(None, &Role::ALL));
        assert!(!can_manage_users(None));
        assert!(!can_delete_users(None));
    }

    #[test]
    fn superadmin_reaches_user_views_but_not_the_reverse() {
        assert!(can_access(Some(&identity(1, Role::Superadmin)), Role::User));
        assert!(!can_access(Some(&identity(4, Role::User)), Role::Admin));
    }

    #[test]
    fn user_list_capabilities() {
        let superadmin = identity(1, Role::Superadmin);
        let admin = identity(2, Role::Admin);
        let moderator = identity(3, Role::Moderator);

        assert!(can_manage_users(Some(&superadmin)));
        assert!(can_manage_users(Some(&admin)));
        assert!(!can_manage_users(Some(&moderator)));

        assert!(can_delete_users(Some(&superadmin)));
        assert!(!can_delete_users(Some(&admin)));
    }

    #[test]
    fn has_any_role_matches_exactly() {
        let moderator = identity(3, Role::Moderator);
        assert!(has_any_role(Some(&moderator), &[Role::Admin, Role::Moderator]));
        // A higher rank does not count as a match.
        assert!(!has_any_role(Some(&identity(1, Role::Superadmin)), &[Role::Moderator]));
    }

    #[test]
    fn explanation_names_the_denial() {
        let explanation = explain_access(None, Role::Moderator);
        assert_eq!(explanation.denial, Some(AccessDenial::MissingIdentity));

        let explanation = explain_access(Some(&identity(4, Role::User)), Role::Admin);
        assert!(!explanation.granted);
        assert_eq!(explanation.denial, Some(AccessDenial::InsufficientRank));
        assert!(explanation.reason.contains("below"));

        let explanation = explain_access(Some(&identity(2, Role::Admin)), Role::Admin);
        assert!(explanation.granted);
        assert_eq!(explanation.denial, None);
    }

    proptest! {
        #[test]
        fn access_is_monotonic(held in any_role(), required in any_role(), lower in any_role()) {
            let id = identity(9, held);
            if can_access(Some(&id), required) && lower.rank() <= required.rank() {
                prop_assert!(can_access(Some(&id), lower));
            }
        }

        #[test]
        fn explanation_agrees_with_can_access(held in any_role(), required in any_role()) {
            let id = identity(9, held);
            prop_assert_eq!(explain_access(Some(&id), required).granted, can_access(Some(&id), required));
        }
    }
}
