//! Route guard verdicts for protected views.

use serde::Serialize;

use crate::access::{AccessDenial, explain_access};
use crate::{Role, SessionHolder};

/// What the navigation layer should do with a protected route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    /// Nobody is signed in; send them to sign in and come back to `return_to`.
    RedirectToLogin { return_to: String },
    /// Signed in without enough privilege.
    RedirectUnauthorized,
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Guard for a view that requires at least `required_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuard {
    required_role: Role,
}

impl RouteGuard {
    pub const fn new(required_role: Role) -> Self {
        Self { required_role }
    }

    pub fn required_role(&self) -> Role {
        self.required_role
    }

    /// Decide a navigation to `requested_location`.
    ///
    /// Reads the session once; never navigates itself.
    pub fn check<S>(&self, session: &S, requested_location: &str) -> GuardDecision
    where
        S: SessionHolder + ?Sized,
    {
        let identity = session.current_identity();
        let explanation = explain_access(identity.as_ref(), self.required_role);

        match explanation.denial {
            None => GuardDecision::Allow,
            Some(AccessDenial::MissingIdentity) => {
                tracing::debug!(location = requested_location, "redirecting to login");
                GuardDecision::RedirectToLogin {
                    return_to: requested_location.to_string(),
                }
            }
            Some(AccessDenial::InsufficientRank) => {
                tracing::warn!(
                    location = requested_location,
                    reason = %explanation.reason,
                    "navigation refused"
                );
                GuardDecision::RedirectUnauthorized
            }
        }
    }
}
