use serde::{Deserialize, Serialize};

use admin_console_core::UserId;

use crate::Role;

/// The minimal shape of an account the policy needs: who, and at what rank.
///
/// Built per decision from whatever user record the caller holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub role: Role,
}

impl Identity {
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_same_account(&self, other: &Identity) -> bool {
        self.id == other.id
    }
}
