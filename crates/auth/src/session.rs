//! Session holder: the source of "who is signed in right now".

use crate::Identity;

/// Exposes the currently authenticated identity, if any.
///
/// Reads are synchronous and side-effect free; decision functions call this
/// once per decision and never keep the result.
pub trait SessionHolder {
    fn current_identity(&self) -> Option<Identity>;

    fn is_authenticated(&self) -> bool {
        self.current_identity().is_some()
    }
}

/// In-process session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn sign_in(&mut self, identity: Identity) {
        tracing::info!(user_id = %identity.id, role = %identity.role, "session started");
        self.identity = Some(identity);
    }

    pub fn sign_out(&mut self) {
        if let Some(identity) = self.identity.take() {
            tracing::info!(user_id = %identity.id, "session ended");
        }
    }
}

impl SessionHolder for Session {
    fn current_identity(&self) -> Option<Identity> {
        self.identity
    }
}

impl SessionHolder for Option<Identity> {
    fn current_identity(&self) -> Option<Identity> {
        *self
    }
}
