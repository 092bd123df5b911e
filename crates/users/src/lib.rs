//! `admin-console-users` — the console's user directory and dialogs.
//!
//! The directory is an in-memory mock of the backend; the dialogs run the
//! policy checks from `admin-console-auth` before asking it for anything.

pub mod directory;
pub mod form;
pub mod user;

pub use directory::{SEED_PASSWORD, UserCommand, UserDirectory};
pub use form::{UserAction, UserFormWorkflow};
pub use user::{AuthResponse, LoginCredentials, User, UserDraft};
