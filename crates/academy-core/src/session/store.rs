//! Observable session store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::identity::Identity;
use crate::traits::AuthApi;

use super::state::Session;

static GLOBAL: OnceLock<SessionStore> = OnceLock::new();

/// Owns the session and publishes every change to subscribers.
///
/// State only moves through [`bootstrap`](Self::bootstrap),
/// [`establish`](Self::establish), [`clear`](Self::clear) and
/// [`invalidate`](Self::invalidate). Each of them replaces the whole
/// [`Session`] in one step, so a reader never observes a half-applied
/// change. Clones share the same underlying state.
#[derive(Clone, Debug)]
pub struct SessionStore {
    sender: Arc<watch::Sender<Session>>,
    // Bumped by every explicit transition so a slow bootstrap cannot
    // overwrite a login or logout that finished while it was waiting.
    epoch: Arc<AtomicU64>,
}

impl SessionStore {
    /// Create a store in the bootstrapping state.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Session::bootstrapping());
        Self {
            sender: Arc::new(sender),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get a copy of the current session.
    pub fn current(&self) -> Session {
        self.sender.borrow().clone()
    }

    /// Access the session without cloning.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        f(&self.sender.borrow())
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sender.subscribe()
    }

    /// Resolve the ambient credential into a session.
    ///
    /// Any failure, including an unreachable service, leaves the session
    /// unauthenticated. `loading` is cleared exactly once whichever branch
    /// is taken. Calling this while already authenticated makes no request
    /// and only clears `loading`.
    #[instrument(skip_all)]
    pub async fn bootstrap<A>(&self, api: &A)
    where
        A: AuthApi + ?Sized,
    {
        if self.with_session(Session::is_authenticated) {
            debug!("Already authenticated, skipping who-am-i");
            self.sender.send_modify(Session::finish_loading);
            return;
        }

        let started_at = self.epoch.load(Ordering::SeqCst);
        let resolved = match api.who_am_i().await {
            Ok(identity) => {
                info!(user = identity.id, role = %identity.role, "Session restored");
                Session::authenticated(identity)
            }
            Err(e) => {
                debug!(error = %e, "No usable credential");
                Session::anonymous()
            }
        };

        self.sender.send_modify(|session| {
            if self.epoch.load(Ordering::SeqCst) == started_at {
                *session = resolved;
            } else {
                debug!("Session changed during bootstrap, keeping newer state");
                session.finish_loading();
            }
        });
    }

    /// Record a completed login.
    #[instrument(skip_all, fields(user = identity.id, role = %identity.role))]
    pub fn establish(&self, identity: Identity) {
        info!("Session established");
        self.transition(Session::authenticated(identity));
    }

    /// Log out: ask the service to revoke the credential, then clear the
    /// local session whatever the service said.
    #[instrument(skip_all)]
    pub async fn clear<A>(&self, api: &A)
    where
        A: AuthApi + ?Sized,
    {
        if let Err(e) = api.logout().await {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }
        info!("Session cleared");
        self.transition(Session::anonymous());
    }

    /// Drop the local session without contacting the service.
    ///
    /// Used when a call reports the session expired after a failed refresh.
    pub fn invalidate(&self) {
        if self.with_session(Session::is_authenticated) {
            info!("Session invalidated");
        }
        self.transition(Session::anonymous());
    }

    /// Pass `result` through, invalidating the session first if it says
    /// the credential is gone for good.
    pub fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result
            && e.is_session_expired()
        {
            self.invalidate();
        }
        result
    }

    fn transition(&self, next: Session) {
        self.sender.send_modify(|session| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *session = next;
        });
    }

    /// Install `store` as the process-wide session store.
    ///
    /// # Errors
    ///
    /// Hands the store back if one was already installed.
    pub fn install_global(store: SessionStore) -> std::result::Result<(), SessionStore> {
        GLOBAL.set(store)
    }

    /// The process-wide session store.
    ///
    /// # Panics
    ///
    /// Panics if [`install_global`](Self::install_global) has not been
    /// called. Reading session state with no store in place is a
    /// programming error.
    pub fn global() -> &'static SessionStore {
        match GLOBAL.get() {
            Some(store) => store,
            None => panic!("SessionStore::global() called before SessionStore::install_global()"),
        }
    }

    /// The process-wide session store, if installed.
    pub fn try_global() -> Option<&'static SessionStore> {
        GLOBAL.get()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
