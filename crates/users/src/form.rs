//! Confirmation-gated create/edit/delete dialogs.
//!
//! Same state machine as the password dialog: local checks in `Editing`,
//! then a confirmation prompt, then the directory call.

use admin_console_auth::workflow::WorkflowEvent;
use admin_console_auth::{Identity, WorkflowError, WorkflowState, can_delete_users, can_manage_users};
use admin_console_core::UserId;

use crate::directory::UserCommand;
use crate::user::{User, UserDraft};

pub const NOT_ALLOWED_TO_MANAGE: &str = "You are not allowed to manage users";
pub const NOT_ALLOWED_TO_DELETE: &str = "You are not allowed to delete users";
pub const GENERIC_FAILURE: &str = "An error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Create,
    Edit(UserId),
    Delete(UserId),
}

#[derive(Debug, Clone)]
pub struct UserFormWorkflow {
    action: UserAction,
    draft: UserDraft,
    state: WorkflowState,
}

impl UserFormWorkflow {
    pub fn create() -> Self {
        Self::with_action(UserAction::Create, UserDraft::default())
    }

    pub fn edit(user: &User) -> Self {
        Self::with_action(UserAction::Edit(user.id), UserDraft::from_user(user))
    }

    pub fn delete(user: &User) -> Self {
        Self::with_action(UserAction::Delete(user.id), UserDraft::from_user(user))
    }

    fn with_action(action: UserAction, draft: UserDraft) -> Self {
        Self {
            action,
            draft,
            state: WorkflowState::editing(),
        }
    }

    pub fn action(&self) -> UserAction {
        self.action
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn submit(
        &mut self,
        actor: Option<&Identity>,
        draft: UserDraft,
    ) -> Result<&WorkflowState, WorkflowError> {
        if !matches!(self.state, WorkflowState::Editing { .. }) {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Submit));
        }
        self.draft = draft;

        let rejection = match self.action {
            UserAction::Delete(_) if !can_delete_users(actor) => Some(NOT_ALLOWED_TO_DELETE.to_string()),
            UserAction::Delete(_) => None,
            UserAction::Create | UserAction::Edit(_) if !can_manage_users(actor) => {
                Some(NOT_ALLOWED_TO_MANAGE.to_string())
            }
            UserAction::Create | UserAction::Edit(_) => {
                self.draft.validate().err().map(|e| e.to_string())
            }
        };

        self.state = match rejection {
            Some(reason) => WorkflowState::Editing {
                reasons: vec![reason],
            },
            None => WorkflowState::AwaitingConfirmation,
        };
        Ok(&self.state)
    }

    pub fn cancel(&mut self) -> Result<&WorkflowState, WorkflowError> {
        if self.state != WorkflowState::AwaitingConfirmation {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Cancel));
        }
        self.state = WorkflowState::editing();
        Ok(&self.state)
    }

    /// Accept the prompt; returns the directory command to run.
    pub fn confirm(&mut self) -> Result<UserCommand, WorkflowError> {
        if self.state != WorkflowState::AwaitingConfirmation {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Confirm));
        }
        self.state = WorkflowState::Submitting;

        Ok(match self.action {
            UserAction::Create => UserCommand::Create(self.draft.clone()),
            UserAction::Edit(id) => UserCommand::Update(id, self.draft.clone()),
            UserAction::Delete(id) => UserCommand::Delete(id),
        })
    }

    pub fn complete(&mut self, outcome: Result<(), String>) -> Result<&WorkflowState, WorkflowError> {
        if self.state != WorkflowState::Submitting {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Complete));
        }
        self.state = match outcome {
            Ok(()) => WorkflowState::Done,
            Err(message) if message.trim().is_empty() => WorkflowState::Editing {
                reasons: vec![GENERIC_FAILURE.to_string()],
            },
            Err(message) => WorkflowState::Editing {
                reasons: vec![message],
            },
        };
        Ok(&self.state)
    }

    pub fn abort(&mut self) -> Result<&WorkflowState, WorkflowError> {
        if self.state != WorkflowState::Submitting {
            return Err(WorkflowError::invalid(&self.state, WorkflowEvent::Abort));
        }
        self.state = WorkflowState::editing();
        Ok(&self.state)
    }
}
