//! User records and the create/edit form payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use admin_console_auth::{Identity, Role};
use admin_console_core::{DomainError, DomainResult, UserId};

pub const REQUIRED_FIELDS: &str = "Please fill in all required fields";

/// A console account as listed in the user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The part of the record policy decisions look at.
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.role)
    }
}

/// Values from the create/edit dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: Role::User,
        }
    }
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Pre-fill the edit dialog from an existing record.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }

    /// Name and email are required; values are trimmed.
    pub fn validate(&self) -> DomainResult<UserDraft> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(DomainError::validation(REQUIRED_FIELDS));
        }
        Ok(UserDraft {
            name: name.to_string(),
            email: email.to_string(),
            role: self.role,
        })
    }
}

/// Email/password pair from the sign-in form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
