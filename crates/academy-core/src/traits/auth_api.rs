//! Authentication service trait.

use async_trait::async_trait;

use crate::Result;
use crate::credentials::{Credentials, OtpCode, Registration};
use crate::identity::{Identity, RegisteredUser};
use crate::types::Email;

/// What the service said after a successful password check.
#[derive(Debug, Clone)]
pub struct PreLoginReceipt {
    /// Server message, e.g. where the code was sent.
    pub message: String,
    /// The code itself, only when the server runs in development mode and
    /// echoes it back instead of delivering it out-of-band.
    pub echoed_code: Option<OtpCode>,
}

/// The authentication endpoints the session core consumes.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Check the password and have a one-time code provisioned.
    ///
    /// Never establishes any session state.
    async fn pre_login(&self, credentials: &Credentials) -> Result<PreLoginReceipt>;

    /// Exchange the one-time code for a session credential and identity.
    async fn verify_otp(&self, email: &Email, code: &OtpCode) -> Result<Identity>;

    /// Resolve the ambient credential into an identity.
    async fn who_am_i(&self) -> Result<Identity>;

    /// Revoke the ambient credential on the service.
    async fn logout(&self) -> Result<()>;

    /// Register a professional account pending approval.
    async fn register(&self, registration: &Registration) -> Result<RegisteredUser>;
}
