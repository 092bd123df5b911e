use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role assigned to a console account.
///
/// The set is closed and totally ordered by privilege:
/// `Superadmin > Admin > Moderator > User`. Every comparison goes through
/// [`Role::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Moderator,
    User,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    /// All roles, most privileged first (the order of the role picker).
    pub const ALL: [Role; 4] = [Role::Superadmin, Role::Admin, Role::Moderator, Role::User];

    /// Privilege rank; higher means more privileged.
    pub const fn rank(self) -> u8 {
        match self {
            Role::Superadmin => 4,
            Role::Admin => 3,
            Role::Moderator => 2,
            Role::User => 1,
        }
    }

    pub const fn is_higher_than(self, other: Role) -> bool {
        self.rank() > other.rank()
    }

    pub const fn is_equal_or_higher_than(self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    /// Superadmins and admins.
    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Superadmin | Role::Admin)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }

    /// Display label ("Superadmin", "Moderator", ...).
    pub const fn label(self) -> &'static str {
        match self {
            Role::Superadmin => "Superadmin",
            Role::Admin => "Admin",
            Role::Moderator => "Moderator",
            Role::User => "User",
        }
    }
}

/// Free-function form of [`Role::rank`].
pub const fn rank(role: Role) -> u8 {
    role.rank()
}

pub const fn is_role_higher_than(a: Role, b: Role) -> bool {
    a.is_higher_than(b)
}

pub const fn is_role_equal_or_higher_than(a: Role, b: Role) -> bool {
    a.is_equal_or_higher_than(b)
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
