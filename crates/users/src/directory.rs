//! In-memory user directory standing in for the console's backend.
//!
//! Seeded with one account per role. Mutations take `&mut self`; sharing a
//! directory between threads is the caller's business.

use chrono::{DateTime, NaiveDate, Utc};

use admin_console_auth::{Identity, PasswordUpdate, Role, can_delete_users, can_manage_users};
use admin_console_core::{DomainError, DomainResult, UserId};

use crate::user::{AuthResponse, LoginCredentials, User, UserDraft};

pub const SEED_PASSWORD: &str = "password";
pub const WRONG_CURRENT_PASSWORD: &str = "Current password is incorrect";
pub const IDS_EXHAUSTED: &str = "UserId: no identifiers left to allocate";

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// Directory mutations the user dialogs can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Create(UserDraft),
    Update(UserId, UserDraft),
    Delete(UserId),
}

#[derive(Debug, Clone)]
pub struct UserDirectory {
    accounts: Vec<Account>,
    /// `None` once the id range is used up.
    next_id: Option<UserId>,
    clock: fn() -> DateTime<Utc>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::empty()
    }
}

fn seed_date(day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

impl UserDirectory {
    pub fn empty() -> Self {
        Self {
            accounts: Vec::new(),
            next_id: Some(UserId::new(1)),
            clock: Utc::now,
        }
    }

    /// The four demo accounts (ids 1..=4), all with [`SEED_PASSWORD`].
    pub fn seeded() -> Self {
        let seed = [
            ("superadmin@example.com", "Super Admin", Role::Superadmin),
            ("admin@example.com", "Admin User", Role::Admin),
            ("moderator@example.com", "Moderator User", Role::Moderator),
            ("user@example.com", "Regular User", Role::User),
        ];

        let mut directory = Self::empty();
        for (day, (email, name, role)) in (1u32..).zip(seed) {
            let Ok(id) = directory.allocate_id() else {
                break;
            };
            let stamp = seed_date(day);
            directory.accounts.push(Account {
                user: User {
                    id,
                    email: email.to_string(),
                    name: name.to_string(),
                    role,
                    created_at: stamp,
                    updated_at: stamp,
                },
                password: SEED_PASSWORD.to_string(),
            });
        }
        directory
    }

    /// Replace the time source (tests pin it).
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn allocate_id(&mut self) -> DomainResult<UserId> {
        let id = self
            .next_id
            .ok_or_else(|| DomainError::invalid_id(IDS_EXHAUSTED))?;
        self.next_id = id.next();
        Ok(id)
    }

    fn position(&self, id: UserId) -> DomainResult<usize> {
        self.accounts
            .iter()
            .position(|account| account.user.id == id)
            .ok_or(DomainError::NotFound)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All accounts in insertion order.
    pub fn list(&self) -> Vec<User> {
        self.accounts.iter().map(|account| account.user.clone()).collect()
    }

    pub fn get(&self, id: UserId) -> DomainResult<User> {
        let index = self.position(id)?;
        Ok(self.accounts[index].user.clone())
    }

    pub fn create(&mut self, draft: &UserDraft) -> DomainResult<User> {
        let draft = draft.validate()?;
        let id = self.allocate_id()?;
        let now = (self.clock)();
        let user = User {
            id,
            email: draft.email,
            name: draft.name,
            role: draft.role,
            created_at: now,
            updated_at: now,
        };

        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        self.accounts.push(Account {
            user: user.clone(),
            password: SEED_PASSWORD.to_string(),
        });
        Ok(user)
    }

    /// Overwrite name, email and role; the id and creation time are kept.
    pub fn update(&mut self, id: UserId, draft: &UserDraft) -> DomainResult<User> {
        let draft = draft.validate()?;
        let index = self.position(id)?;
        let now = (self.clock)();

        let user = &mut self.accounts[index].user;
        user.name = draft.name;
        user.email = draft.email;
        user.role = draft.role;
        user.updated_at = now;

        tracing::info!(user_id = %id, role = %user.role, "user updated");
        Ok(user.clone())
    }

    pub fn delete(&mut self, id: UserId) -> DomainResult<()> {
        let index = self.position(id)?;
        self.accounts.remove(index);
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    pub fn execute(&mut self, command: &UserCommand) -> DomainResult<()> {
        match command {
            UserCommand::Create(draft) => self.create(draft).map(|_| ()),
            UserCommand::Update(id, draft) => self.update(*id, draft).map(|_| ()),
            UserCommand::Delete(id) => self.delete(*id),
        }
    }

    /// [`execute`](Self::execute) on behalf of `actor`: creating and editing
    /// need an admin, deleting needs a superadmin.
    pub fn execute_as(&mut self, actor: Option<&Identity>, command: &UserCommand) -> DomainResult<()> {
        let allowed = match command {
            UserCommand::Create(_) | UserCommand::Update(..) => can_manage_users(actor),
            UserCommand::Delete(_) => can_delete_users(actor),
        };
        if !allowed {
            tracing::warn!(
                actor = actor.map(|a| a.id.get()),
                ?command,
                "directory command refused"
            );
            return Err(DomainError::Unauthorized);
        }
        self.execute(command)
    }

    /// Store a new password.
    ///
    /// Self-service changes must present the current password; admin changes
    /// skip that check.
    pub fn update_password(
        &mut self,
        id: UserId,
        current_password: &str,
        new_password: &str,
        is_admin_change: bool,
    ) -> DomainResult<()> {
        let index = self.position(id)?;
        let account = &mut self.accounts[index];

        if !is_admin_change && account.password != current_password {
            tracing::warn!(user_id = %id, "password change with wrong current password");
            return Err(DomainError::validation(WRONG_CURRENT_PASSWORD));
        }

        account.password = new_password.to_string();
        account.user.updated_at = (self.clock)();
        tracing::info!(user_id = %id, is_admin_change, "password changed");
        Ok(())
    }

    pub fn apply_password_update(&mut self, update: &PasswordUpdate) -> DomainResult<()> {
        self.update_password(
            update.user_id,
            &update.current_password,
            &update.new_password,
            update.is_admin_change,
        )
    }

    /// Mock sign-in against the stored passwords.
    pub fn authenticate(&self, credentials: &LoginCredentials) -> DomainResult<AuthResponse> {
        let email = credentials.email.trim();
        let account = self
            .accounts
            .iter()
            .find(|account| account.user.email.eq_ignore_ascii_case(email))
            .filter(|account| account.password == credentials.password);

        match account {
            Some(account) => {
                tracing::info!(user_id = %account.user.id, "sign-in succeeded");
                Ok(AuthResponse {
                    token: format!("mock_token_{}", account.user.role),
                    user: account.user.clone(),
                })
            }
            None => {
                tracing::warn!(email, "sign-in failed");
                Err(DomainError::InvalidCredentials)
            }
        }
    }
}
