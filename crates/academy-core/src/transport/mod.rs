//! Credential-refreshing transport.
//!
//! [`AuthenticatedTransport`] wraps any [`Transport`](crate::Transport)
//! and recovers from a rejected credential with one shared refresh, using
//! [`SingleFlight`] to collapse concurrent refresh attempts.

mod authenticated;
mod single_flight;

pub use authenticated::{AuthenticatedTransport, RefreshOutcome};
pub use single_flight::SingleFlight;
