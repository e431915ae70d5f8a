//! Role-based access decision for protected screens.

use tokio::sync::watch;

use crate::session::Session;
use crate::types::Role;

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the screen.
    Allow,
    /// Nobody is logged in.
    RedirectLogin,
    /// Logged in, but the role is not one of the required ones.
    RedirectUnauthorized,
    /// The session is still being resolved; show a neutral waiting state.
    Pending,
}

/// Decide whether `session` may reach a screen requiring one of `required`.
///
/// An empty `required` means any authenticated identity. Never cache the
/// result: evaluate on every navigation, since the session can change in
/// between.
pub fn decide(session: &Session, required: &[Role]) -> Decision {
    if session.is_loading() {
        return Decision::Pending;
    }
    match session.identity() {
        None => Decision::RedirectLogin,
        Some(identity) if !required.is_empty() && !identity.has_any_role(required) => {
            Decision::RedirectUnauthorized
        }
        Some(_) => Decision::Allow,
    }
}

/// The role requirement of one protected boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gate {
    required: Vec<Role>,
}

impl Gate {
    /// A gate any authenticated identity passes.
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    /// A gate that requires one of `roles`.
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required: roles.into_iter().collect(),
        }
    }

    pub fn required(&self) -> &[Role] {
        &self.required
    }

    pub fn decide(&self, session: &Session) -> Decision {
        decide(session, &self.required)
    }

    /// Wait until the session settles, then decide.
    ///
    /// Returns immediately if the session is already settled. If the store
    /// goes away while still loading, the last seen session is used, which
    /// yields [`Decision::Pending`].
    pub async fn wait(&self, rx: &mut watch::Receiver<Session>) -> Decision {
        if let Ok(session) = rx.wait_for(|session| !session.is_loading()).await {
            return self.decide(&session);
        }
        self.decide(&rx.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::testing::identity;

    #[test]
    fn decision_table() {
        use Decision::*;
        use Role::*;

        let signed_in = |role| Session::authenticated(identity(role));
        let cases: [(Session, &[Role], Decision); 9] = [
            (Session::bootstrapping(), &[], Pending),
            (Session::bootstrapping(), &[Administrator], Pending),
            (Session::anonymous(), &[], RedirectLogin),
            (Session::anonymous(), &[Coordinator], RedirectLogin),
            (signed_in(Professional), &[Administrator], RedirectUnauthorized),
            (signed_in(Administrator), &[Administrator, Coordinator], Allow),
            (signed_in(Coordinator), &[Administrator, Coordinator], Allow),
            (signed_in(Professional), &[], Allow),
            (signed_in(Administrator), &[Professional], RedirectUnauthorized),
        ];

        for (session, required, expected) in cases {
            assert_eq!(
                decide(&session, required),
                expected,
                "session={session:?} required={required:?}"
            );
        }
    }

    #[test]
    fn gate_reevaluates_against_current_session() {
        let store = SessionStore::new();
        let gate = Gate::roles([Role::Coordinator]);

        store.establish(identity(Role::Coordinator));
        assert_eq!(store.with_session(|s| gate.decide(s)), Decision::Allow);

        store.invalidate();
        assert_eq!(store.with_session(|s| gate.decide(s)), Decision::RedirectLogin);
    }

    #[tokio::test]
    async fn wait_resolves_once_session_settles() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        let gate = Gate::roles([Role::Administrator]);

        let waiter = tokio::spawn(async move { gate.wait(&mut rx).await });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        store.establish(identity(Role::Professional));

        assert_eq!(waiter.await.unwrap(), Decision::RedirectUnauthorized);
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_settled() {
        let store = SessionStore::new();
        store.invalidate();
        let mut rx = store.subscribe();

        let decision = Gate::any_authenticated().wait(&mut rx).await;
        assert_eq!(decision, Decision::RedirectLogin);
    }
}
