//! Password-change workflow as an explicit state machine.
//!
//! ```text
//! Editing --submit(ok)--> AwaitingConfirmation --confirm--> Submitting --complete(ok)--> Done
//!    ^                          |                               |
//!    +--------cancel------------+                               |
//!    +---------------complete(err) / abort---------------------+
//! ```
//!
//! The backend call itself is out of scope: `confirm` hands back the payload
//! and the caller reports the outcome through `complete` or `abort`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use admin_console_core::UserId;

use crate::password::{
    PasswordChangeRequest, PasswordRules, can_change_password, required_strictness,
};
use crate::Identity;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const FILL_NEW_AND_CONFIRM: &str = "Please fill in new password and confirmation";
pub const PASSWORDS_DO_NOT_MATCH: &str = "New password and confirm password do not match";
pub const NOT_SIGNED_IN: &str = "You must be signed in to change a password";
pub const NOT_PERMITTED: &str = "You are not allowed to change this user's password";
pub const SAME_AS_CURRENT: &str = "New password must be different from current password";
pub const GENERIC_FAILURE: &str = "Failed to update password. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    /// Form is editable; `reasons` holds whatever the last attempt surfaced.
    Editing { reasons: Vec<String> },
    AwaitingConfirmation,
    Submitting,
    Done,
}

impl WorkflowState {
    pub fn editing() -> Self {
        WorkflowState::Editing { reasons: Vec::new() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Editing { .. } => "editing",
            WorkflowState::AwaitingConfirmation => "awaiting_confirmation",
            WorkflowState::Submitting => "submitting",
            WorkflowState::Done => "done",
        }
    }

    /// Reasons shown inline under the form (empty outside `Editing`).
    pub fn reasons(&self) -> &[String] {
        match self {
            WorkflowState::Editing { reasons } => reasons.as_slice(),
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEvent {
    Submit,
    Confirm,
    Cancel,
    Complete,
    Abort,
}

impl core::fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            WorkflowEvent::Submit => "submit",
            WorkflowEvent::Confirm => "confirm",
            WorkflowEvent::Cancel => "cancel",
            WorkflowEvent::Complete => "complete",
            WorkflowEvent::Abort => "abort",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("cannot {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: WorkflowEvent,
    },
}

impl WorkflowError {
    pub fn invalid(state: &WorkflowState, event: WorkflowEvent) -> Self {
        tracing::warn!(state = state.name(), %event, "rejected workflow event");
        WorkflowError::InvalidTransition {
            state: state.name(),
            event,
        }
    }
}

/// Values typed into the password dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordForm {
    pub fn self_service(current: &str, new: &str, confirm: &str) -> Self {
        Self {
            current_password: current.to_string(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    pub fn admin_override(new: &str, confirm: &str) -> Self {
        Self {
            current_password: String::new(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }
}

/// Payload for the backend once the user confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub user_id: UserId,
    /// Empty on admin overrides.
    pub current_password: String,
    pub new_password: String,
    pub is_admin_change: bool,
}

#[derive(Debug, Clone)]
pub struct PasswordChangeWorkflow {
    target: Identity,
    is_admin_change: bool,
    /// Whether the last successful submit was a real override (flag set and
    /// actor differs from the target).
    submitted_override: bool,
    rules: PasswordRules,
    form: PasswordForm,
    state: WorkflowState,
}

impl PasswordChangeWorkflow {
    pub fn new(target: Identity, is_admin_change: bool) -> Self {
        Self {
            target,
            is_admin_change,
            submitted_override: false,
            rules: PasswordRules::default(),
            form: PasswordForm::default(),
            state: WorkflowState::editing(),
        }
    }

    /// Open the dialog for `target`; it is an admin change when someone other
    /// than the target opened it.
    pub fn opened_by(actor: Option<&Identity>, target: Identity) -> Self {
        let is_admin_change = actor.is_some_and(|a| !a.is_same_account(&target));
        Self::new(target, is_admin_change)
    }

    pub fn with_rules(mut self, rules: PasswordRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn form(&self) -> &PasswordForm {
        &self.form
    }

    pub fn target(&self) -> Identity {
        self.target
    }

    pub fn is_admin_change(&self) -> bool {
        self.is_admin_change
    }

    /// The override flag only counts when someone other than the target
    /// submits.
    fn is_override_by(&self, actor: Option<&Identity>) -> bool {
        self.is_admin_change && actor.is_some_and(|a| !a.is_same_account(&self.target))
    }

    /// Validate locally and move to confirmation.
    ///
    /// A validation failure is not an error: the workflow stays in `Editing`
    /// with the reasons attached.
    pub fn submit(
        &mut self,
        actor: Option<&Identity>,
        form: PasswordForm,
    ) -> Result<&WorkflowState, WorkflowError> {
        if !matches!(self.state, WorkflowState::Editing { .. }) {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Submit));
        }

        self.form = form;
        let is_override = self.is_override_by(actor);
        let reasons = self.local_validation(actor, is_override);

        self.state = if reasons.is_empty() {
            self.submitted_override = is_override;
            WorkflowState::AwaitingConfirmation
        } else {
            tracing::debug!(target_user = %self.target.id, ?reasons, "password form rejected");
            WorkflowState::Editing { reasons }
        };
        Ok(&self.state)
    }

    fn local_validation(&self, actor: Option<&Identity>, is_override: bool) -> Vec<String> {
        let form = &self.form;

        if is_override {
            if form.new_password.is_empty() || form.confirm_password.is_empty() {
                return vec![FILL_NEW_AND_CONFIRM.to_string()];
            }
        } else if form.current_password.is_empty()
            || form.new_password.is_empty()
            || form.confirm_password.is_empty()
        {
            return vec![FILL_ALL_FIELDS.to_string()];
        }

        if form.new_password != form.confirm_password {
            return vec![PASSWORDS_DO_NOT_MATCH.to_string()];
        }

        let Some(actor) = actor else {
            return vec![NOT_SIGNED_IN.to_string()];
        };

        let request = PasswordChangeRequest {
            actor: *actor,
            target: self.target,
            is_admin_override: is_override,
        };
        if !can_change_password(&request) {
            return vec![NOT_PERMITTED.to_string()];
        }

        let strictness = required_strictness(Some(actor), &self.target, is_override);
        let validation = self.rules.validate(&form.new_password, strictness);
        if !validation.valid {
            return validation.reasons;
        }

        if !is_override && form.current_password == form.new_password {
            return vec![SAME_AS_CURRENT.to_string()];
        }

        Vec::new()
    }

    /// Back out of the confirmation prompt; the form keeps its values.
    pub fn cancel(&mut self) -> Result<&WorkflowState, WorkflowError> {
        if self.state != WorkflowState::AwaitingConfirmation {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Cancel));
        }
        self.state = WorkflowState::editing();
        Ok(&self.state)
    }

    /// Accept the confirmation prompt and hand out the backend payload.
    pub fn confirm(&mut self) -> Result<PasswordUpdate, WorkflowError> {
        if self.state != WorkflowState::AwaitingConfirmation {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Confirm));
        }
        self.state = WorkflowState::Submitting;

        let current_password = if self.submitted_override {
            String::new()
        } else {
            self.form.current_password.clone()
        };

        Ok(PasswordUpdate {
            user_id: self.target.id,
            current_password,
            new_password: self.form.new_password.clone(),
            is_admin_change: self.submitted_override,
        })
    }

    /// Report the backend outcome.
    pub fn complete(&mut self, outcome: Result<(), String>) -> Result<&WorkflowState, WorkflowError> {
        if self.state != WorkflowState::Submitting {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Complete));
        }

        self.state = match outcome {
            Ok(()) => {
                tracing::info!(target_user = %self.target.id, "password updated");
                self.form = PasswordForm::default();
                WorkflowState::Done
            }
            Err(message) => {
                let message = if message.trim().is_empty() {
                    GENERIC_FAILURE.to_string()
                } else {
                    message
                };
                tracing::warn!(target_user = %self.target.id, %message, "password update failed");
                WorkflowState::Editing {
                    reasons: vec![message],
                }
            }
        };
        Ok(&self.state)
    }

    /// The backend call was cancelled or timed out: back to editing, nothing
    /// applied.
    pub fn abort(&mut self) -> Result<&WorkflowState, WorkflowError> {
        if self.state != WorkflowState::Submitting {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Abort));
        }
        self.state = WorkflowState::editing();
        Ok(&self.state)
    }

    /// Dialog closed: forget everything typed so far.
    pub fn reset(&mut self) {
        self.form = PasswordForm::default();
        self.submitted_override = false;
        self.state = WorkflowState::editing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn identity(id: i64, role: Role) -> Identity {
        Identity::new(UserId::new(id), role)
    }

    #[test]
    fn admin_override_reaches_confirmation() {
        let admin = identity(2, Role::Admin);
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&admin), user);
        assert!(workflow.is_admin_change());

        let state = workflow
            .submit(Some(&admin), PasswordForm::admin_override("newpass1", "newpass1"))
            .unwrap();
        assert_eq!(state, &WorkflowState::AwaitingConfirmation);

        let update = workflow.confirm().unwrap();
        assert_eq!(update.user_id, UserId::new(4));
        assert!(update.current_password.is_empty());
        assert!(update.is_admin_change);
        assert_eq!(workflow.state(), &WorkflowState::Submitting);

        workflow.complete(Ok(())).unwrap();
        assert_eq!(workflow.state(), &WorkflowState::Done);
        assert_eq!(workflow.form(), &PasswordForm::default());
    }

    #[test]
    fn missing_fields_depend_on_change_kind() {
        let user = identity(4, Role::User);
        let mut own = PasswordChangeWorkflow::opened_by(Some(&user), user);
        let state = own
            .submit(Some(&user), PasswordForm::self_service("", "abcdef", "abcdef"))
            .unwrap();
        assert_eq!(state.reasons(), [FILL_ALL_FIELDS.to_string()]);

        let admin = identity(2, Role::Admin);
        let mut other = PasswordChangeWorkflow::opened_by(Some(&admin), user);
        let state = other
            .submit(Some(&admin), PasswordForm::admin_override("abcdef", ""))
            .unwrap();
        assert_eq!(state.reasons(), [FILL_NEW_AND_CONFIRM.to_string()]);
    }

    #[test]
    fn mismatched_confirmation_stays_editing() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&user), user);
        let state = workflow
            .submit(Some(&user), PasswordForm::self_service("password", "abcdef", "abcdeg"))
            .unwrap();
        assert_eq!(state.reasons(), [PASSWORDS_DO_NOT_MATCH.to_string()]);
    }

    #[test]
    fn self_service_rejects_unchanged_password() {
        let moderator = identity(3, Role::Moderator);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&moderator), moderator);
        let state = workflow
            .submit(Some(&moderator), PasswordForm::self_service("secret", "secret", "secret"))
            .unwrap();
        assert_eq!(state.reasons(), [SAME_AS_CURRENT.to_string()]);
    }

    #[test]
    fn admin_override_skips_unchanged_check() {
        let superadmin = identity(1, Role::Superadmin);
        let moderator = identity(3, Role::Moderator);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&superadmin), moderator);
        let state = workflow
            .submit(Some(&superadmin), PasswordForm::admin_override("password", "password"))
            .unwrap();
        assert_eq!(state, &WorkflowState::AwaitingConfirmation);
    }

    #[test]
    fn short_basic_password_is_rejected() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&user), user);
        let state = workflow
            .submit(Some(&user), PasswordForm::self_service("password", "abc", "abc"))
            .unwrap();
        assert_eq!(
            state.reasons(),
            ["Password must be at least 6 characters long".to_string()]
        );
    }

    #[test]
    fn equal_rank_override_is_not_permitted() {
        let admin = identity(2, Role::Admin);
        let other_admin = identity(5, Role::Admin);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&admin), other_admin);
        let state = workflow
            .submit(Some(&admin), PasswordForm::admin_override("whatever", "whatever"))
            .unwrap();
        assert_eq!(state.reasons(), [NOT_PERMITTED.to_string()]);
    }

    #[test]
    fn signed_out_actor_is_rejected() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::new(user, false);
        let state = workflow
            .submit(None, PasswordForm::self_service("password", "abcdef", "abcdef"))
            .unwrap();
        assert_eq!(state.reasons(), [NOT_SIGNED_IN.to_string()]);
    }

    #[test]
    fn configured_rules_apply() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&user), user)
            .with_rules(PasswordRules { min_length: 10 });
        let state = workflow
            .submit(Some(&user), PasswordForm::self_service("password", "abcdef12", "abcdef12"))
            .unwrap();
        assert_eq!(
            state.reasons(),
            ["Password must be at least 10 characters long".to_string()]
        );
    }

    #[test]
    fn cancel_returns_to_editing_with_form_intact() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&user), user);
        let form = PasswordForm::self_service("password", "abcdef", "abcdef");
        workflow.submit(Some(&user), form.clone()).unwrap();

        assert_eq!(workflow.cancel().unwrap(), &WorkflowState::editing());
        assert_eq!(workflow.form(), &form);
    }

    #[test]
    fn backend_failure_keeps_message_for_retry() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&user), user);
        workflow
            .submit(Some(&user), PasswordForm::self_service("wrong", "abcdef", "abcdef"))
            .unwrap();
        workflow.confirm().unwrap();

        let state = workflow
            .complete(Err("Current password is incorrect".to_string()))
            .unwrap();
        assert_eq!(state.reasons(), ["Current password is incorrect".to_string()]);

        // Retry from the retained form.
        let form = workflow.form().clone();
        assert_eq!(workflow.submit(Some(&user), form).unwrap(), &WorkflowState::AwaitingConfirmation);
    }

    #[test]
    fn blank_backend_message_is_replaced() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&user), user);
        workflow
            .submit(Some(&user), PasswordForm::self_service("password", "abcdef", "abcdef"))
            .unwrap();
        workflow.confirm().unwrap();
        let state = workflow.complete(Err(String::new())).unwrap();
        assert_eq!(state.reasons(), [GENERIC_FAILURE.to_string()]);
    }

    #[test]
    fn abort_reverts_without_message() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&user), user);
        workflow
            .submit(Some(&user), PasswordForm::self_service("password", "abcdef", "abcdef"))
            .unwrap();
        workflow.confirm().unwrap();

        assert_eq!(workflow.abort().unwrap(), &WorkflowState::editing());
    }

    #[test]
    fn double_submit_is_rejected() {
        let admin = identity(2, Role::Admin);
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&admin), user);
        let form = PasswordForm::admin_override("newpass1", "newpass1");
        workflow.submit(Some(&admin), form.clone()).unwrap();
        workflow.confirm().unwrap();

        let err = workflow.submit(Some(&admin), form).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                state: "submitting",
                event: WorkflowEvent::Submit
            }
        );
        assert_eq!(err.to_string(), "cannot submit while submitting");
        assert!(workflow.confirm().is_err());
    }

    #[test]
    fn events_outside_their_state_are_rejected() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&user), user);
        assert!(workflow.confirm().is_err());
        assert!(workflow.cancel().is_err());
        assert!(workflow.complete(Ok(())).is_err());
        assert!(workflow.abort().is_err());
        assert_eq!(workflow.state(), &WorkflowState::editing());
    }

    #[test]
    fn reset_clears_everything() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&user), user);
        workflow
            .submit(Some(&user), PasswordForm::self_service("password", "abc", "abc"))
            .unwrap();
        workflow.reset();
        assert_eq!(workflow.state(), &WorkflowState::editing());
        assert_eq!(workflow.form(), &PasswordForm::default());
    }

    #[test]
    fn override_flag_on_own_account_is_a_self_service_change() {
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::new(user, true);

        let state = workflow
            .submit(Some(&user), PasswordForm::admin_override("password", "password"))
            .unwrap();
        assert_eq!(state.reasons(), [FILL_ALL_FIELDS.to_string()]);

        let state = workflow
            .submit(Some(&user), PasswordForm::self_service("password", "password", "password"))
            .unwrap();
        assert_eq!(state.reasons(), [SAME_AS_CURRENT.to_string()]);

        workflow
            .submit(Some(&user), PasswordForm::self_service("password", "newpass1", "newpass1"))
            .unwrap();
        let update = workflow.confirm().unwrap();
        assert!(!update.is_admin_change);
        assert_eq!(update.current_password, "password");
    }

    #[test]
    fn target_submitting_an_admin_opened_dialog_needs_current_password() {
        let admin = identity(2, Role::Admin);
        let user = identity(4, Role::User);
        let mut workflow = PasswordChangeWorkflow::opened_by(Some(&admin), user);
        assert!(workflow.is_admin_change());

        let state = workflow
            .submit(Some(&user), PasswordForm::admin_override("newpass1", "newpass1"))
            .unwrap();
        assert_eq!(state.reasons(), [FILL_ALL_FIELDS.to_string()]);

        workflow
            .submit(Some(&user), PasswordForm::self_service("password", "newpass1", "newpass1"))
            .unwrap();
        let update = workflow.confirm().unwrap();
        assert!(!update.is_admin_change);
        assert_eq!(update.current_password, "password");
    }
}
