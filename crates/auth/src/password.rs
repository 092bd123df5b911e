//! Password-change authorization and password strength policy.

use serde::{Deserialize, Serialize};

use admin_console_core::ConsoleConfig;

use crate::{Identity, SessionHolder};

pub const DEFAULT_MIN_LENGTH: usize = 6;

pub const MISSING_DIGIT: &str = "Password must contain at least one number";
pub const MISSING_SYMBOL: &str =
    "Password must contain at least one symbol (e.g., !@#$%^&*()_+-=[]{}|;:,.<>?)";

// ─────────────────────────────────────────────────────────────────────────────
// Authorization
// ─────────────────────────────────────────────────────────────────────────────

/// Who is attempting to change whose password.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChangeRequest {
    pub actor: Identity,
    pub target: Identity,
    pub is_admin_override: bool,
}

impl PasswordChangeRequest {
    pub fn self_service(identity: Identity) -> Self {
        Self {
            actor: identity,
            target: identity,
            is_admin_override: false,
        }
    }

    pub fn admin_override(actor: Identity, target: Identity) -> Self {
        Self {
            actor,
            target,
            is_admin_override: true,
        }
    }
}

/// Anyone may change their own password; changing someone else's requires a
/// strictly higher rank than theirs.
pub fn can_change_password(request: &PasswordChangeRequest) -> bool {
    let PasswordChangeRequest { actor, target, .. } = request;
    let permitted = actor.is_same_account(target) || actor.role.is_higher_than(target.role);
    tracing::debug!(
        actor = %actor.id,
        target_user = %target.id,
        permitted,
        "password change authorization"
    );
    permitted
}

/// [`can_change_password`] with the actor taken from the current session.
pub fn authorize_password_change<S>(session: &S, target: Identity, is_admin_override: bool) -> bool
where
    S: SessionHolder + ?Sized,
{
    match session.current_identity() {
        Some(actor) => can_change_password(&PasswordChangeRequest {
            actor,
            target,
            is_admin_override,
        }),
        None => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Strength policy
// ─────────────────────────────────────────────────────────────────────────────

/// Which rule set applies to a new password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// No rules.
    Bypass,
    /// Minimum length only.
    Basic,
    /// Minimum length, a digit and a symbol.
    Strict,
}

impl Strictness {
    /// Rule summary shown under the password input, using the default rules.
    pub fn hint(self) -> String {
        PasswordRules::default().hint(self)
    }
}

/// Select the rule set for a change of `target`'s password by `actor`.
///
/// The override flag only counts when the accounts differ. Without an actor
/// the most restrictive set applies.
pub fn required_strictness(
    actor: Option<&Identity>,
    target: &Identity,
    is_admin_change: bool,
) -> Strictness {
    let Some(actor) = actor else {
        return Strictness::Strict;
    };

    let is_override = is_admin_change && !actor.is_same_account(target);
    let strictness = match (is_override, actor.role.is_admin(), target.role.is_admin()) {
        (true, _, true) => Strictness::Bypass,
        (true, _, false) => Strictness::Basic,
        (false, true, _) => Strictness::Bypass,
        (false, false, _) => Strictness::Basic,
    };

    tracing::debug!(
        actor = %actor.id,
        target_user = %target.id,
        is_override,
        ?strictness,
        "password strictness selected"
    );
    strictness
}

/// Outcome of checking a candidate password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordValidation {
    pub valid: bool,
    /// One entry per unmet rule: length, then digit, then symbol.
    pub reasons: Vec<String>,
}

impl PasswordValidation {
    fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            valid: reasons.is_empty(),
            reasons,
        }
    }
}

/// Tunable parameters of the password rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordRules {
    pub min_length: usize,
}

impl Default for PasswordRules {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl PasswordRules {
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    pub fn length_reason(&self) -> String {
        format!("Password must be at least {} characters long", self.min_length)
    }

    pub fn validate(&self, password: &str, strictness: Strictness) -> PasswordValidation {
        let mut reasons = Vec::new();

        if strictness == Strictness::Bypass {
            return PasswordValidation::from_reasons(reasons);
        }

        if password.chars().count() < self.min_length {
            reasons.push(self.length_reason());
        }

        if strictness == Strictness::Strict {
            if !password.chars().any(char::is_numeric) {
                reasons.push(MISSING_DIGIT.to_string());
            }
            if !password.chars().any(|c| !c.is_alphanumeric()) {
                reasons.push(MISSING_SYMBOL.to_string());
            }
        }

        PasswordValidation::from_reasons(reasons)
    }

    pub fn hint(&self, strictness: Strictness) -> String {
        match strictness {
            Strictness::Bypass => "No password restrictions (Superadmin/Admin privilege)".to_string(),
            Strictness::Basic => self.length_reason(),
            Strictness::Strict => format!(
                "{} and contain at least one number and one symbol (!@#$%^&*()_+-=[]{{}}|;:,.<>?)",
                self.length_reason()
            ),
        }
    }
}

/// Check `password` against the default rules for `strictness`.
pub fn validate_password(password: &str, strictness: Strictness) -> PasswordValidation {
    PasswordRules::default().validate(password, strictness)
}
