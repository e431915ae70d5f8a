//! Snapshot of the current session.

use crate::identity::Identity;
use crate::types::Role;

/// What the client currently knows about who is logged in.
///
/// `authenticated` is derived from the presence of an identity, so the two
/// can never disagree. `loading` is true only until the first bootstrap
/// (or a login) settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    loading: bool,
}

impl Session {
    /// The state at process start: nothing known yet.
    pub fn bootstrapping() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }

    /// Settled, nobody logged in.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            loading: false,
        }
    }

    /// Settled, logged in as `identity`.
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            loading: false,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The role of the logged-in identity, if any.
    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|identity| identity.role)
    }

    pub(crate) fn finish_loading(&mut self) {
        self.loading = false;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::bootstrapping()
    }
}
