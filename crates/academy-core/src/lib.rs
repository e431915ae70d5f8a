//! academy-core - session and authentication core for the academy admin client.
//!
//! Everything that talks to the coordination service flows through a
//! [`Transport`]. The pieces built on top of it are:
//!
//! - [`AuthenticatedTransport`], which recovers from an expired credential
//!   with a single shared refresh no matter how many callers hit a 401.
//! - [`SessionStore`], the process-wide observable session.
//! - [`LoginFlow`], the two-step password + one-time-code login.
//! - [`decide`] and [`Gate`], the role-based access decision for screens.
//!
//! # Example
//!
//! ```no_run
//! use academy_core::{decide, Decision, Role, SessionStore};
//!
//! let store = SessionStore::new();
//! // Nothing has been resolved yet, so every protected screen waits.
//! let decision = store.with_session(|session| decide(session, &[Role::Administrator]));
//! assert_eq!(decision, Decision::Pending);
//! ```

pub mod credentials;
pub mod error;
pub mod guard;
pub mod identity;
pub mod login;
pub mod screen;
pub mod service;
pub mod session;
pub mod traits;
pub mod transport;
pub mod types;
pub mod wire;

#[cfg(test)]
mod testing;

pub use credentials::{Credentials, OtpCode, Password, Registration};
pub use error::Error;
pub use guard::{Decision, Gate, decide};
pub use identity::{Identity, RegisteredUser};
pub use login::{LoginFlow, LoginStep};
pub use screen::{Destination, Screen, navigate};
pub use service::AuthService;
pub use session::{Session, SessionStore};
pub use traits::{AuthApi, PreLoginReceipt, Transport};
pub use transport::{AuthenticatedTransport, RefreshOutcome, SingleFlight};
pub use types::{ApiUrl, Email, Role};
pub use wire::{ApiRequest, ApiResponse, Method};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
