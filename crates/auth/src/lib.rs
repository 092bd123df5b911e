//! `admin-console-auth` — role-based authorization and password-change policy.
//!
//! Every decision here is a pure function of its arguments: no IO, no stored
//! session, nothing cached between calls. Callers fetch the current identity
//! from a [`SessionHolder`] and act on the verdicts.

pub mod access;
pub mod guard;
pub mod identity;
pub mod password;
pub mod roles;
pub mod session;
pub mod workflow;

pub use access::{can_access, can_delete_users, can_manage_users, has_any_role, has_role};
pub use guard::{GuardDecision, RouteGuard};
pub use identity::Identity;
pub use password::{
    PasswordChangeRequest, PasswordRules, PasswordValidation, Strictness, can_change_password,
    required_strictness, validate_password,
};
pub use roles::{Role, UnknownRole, is_role_equal_or_higher_than, is_role_higher_than, rank};
pub use session::{Session, SessionHolder};
pub use workflow::{PasswordChangeWorkflow, PasswordForm, PasswordUpdate, WorkflowError, WorkflowState};
