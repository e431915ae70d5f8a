//! academy-http - reqwest-backed transport for the academy session core.
//!
//! The ambient credential is a cookie jar owned by [`HttpTransport`]: the
//! service sets its session cookies on verify and refresh, and every
//! later request carries them without the caller's help.

mod config;
mod transport;

pub use config::ClientConfig;
pub use transport::HttpTransport;

use academy_core::{AuthService, Result};

/// Build an [`AuthService`] talking HTTP to `config.api`.
///
/// # Errors
///
/// Fails only if the HTTP client cannot be constructed.
pub fn connect(config: &ClientConfig) -> Result<AuthService<HttpTransport>> {
    Ok(AuthService::new(HttpTransport::new(config)?))
}
