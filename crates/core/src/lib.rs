//! `admin-console-core` — shared primitives for the admin console crates.
//!
//! Pure domain types only: identifiers, the error model and configuration.

pub mod config;
pub mod error;
pub mod id;

pub use config::{ConfigError, ConsoleConfig};
pub use error::{DomainError, DomainResult};
pub use id::UserId;
