//! Typed authentication calls over a [`Transport`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use crate::Result;
use crate::credentials::{Credentials, OtpCode, Registration};
use crate::error::{AuthError, Error};
use crate::identity::{Identity, RegisteredUser};
use crate::traits::{AuthApi, PreLoginReceipt, Transport};
use crate::transport::{AuthenticatedTransport, RefreshOutcome};
use crate::types::Email;
use crate::wire::{self, ApiRequest, ApiResponse, Envelope, PreLoginData, UserData};

/// The authentication endpoints, implemented over any [`Transport`].
///
/// Pre-login, verify and register go out on the bare transport: a 401
/// there means wrong credentials, not an expired session. Who-am-i and
/// logout go through the [`AuthenticatedTransport`], so an expired
/// credential is refreshed once before the call gives up.
pub struct AuthService<T> {
    raw: Arc<T>,
    authed: AuthenticatedTransport<T>,
}

impl<T: Transport> AuthService<T> {
    pub fn new(transport: T) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    /// Build over a transport that is shared with other callers.
    pub fn from_arc(transport: Arc<T>) -> Self {
        Self {
            authed: AuthenticatedTransport::new(Arc::clone(&transport)),
            raw: transport,
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.raw
    }

    /// The refreshing transport, for callers issuing their own requests.
    pub fn authenticated(&self) -> &AuthenticatedTransport<T> {
        &self.authed
    }

    /// Exchange the ambient refresh credential for a fresh one.
    ///
    /// Joins a refresh already in flight rather than starting another.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        match self.authed.refresh().await {
            RefreshOutcome::Refreshed => Ok(()),
            RefreshOutcome::Rejected => Err(AuthError::RefreshRejected.into()),
        }
    }

    async fn send_raw(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let response = self.raw.execute(request).await?;
        trace!(status = response.status(), path = request.path(), "response");
        Ok(response)
    }

    async fn send_authed(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let response = self.authed.send(request).await?;
        trace!(status = response.status(), path = request.path(), "response");
        if response.is_unauthorized() {
            return Err(AuthError::SessionExpired.into());
        }
        Ok(response)
    }
}

/// Decode a success envelope, or turn the response into a protocol error.
fn handle_response<D: DeserializeOwned>(
    response: &ApiResponse,
    fallback: &str,
) -> Result<Envelope<D>> {
    if response.is_success() {
        response.data()
    } else {
        Err(Error::Protocol(response.protocol_error(fallback)))
    }
}

#[async_trait]
impl<T: Transport> AuthApi for AuthService<T> {
    #[instrument(skip_all, fields(email = %credentials.email()))]
    async fn pre_login(&self, credentials: &Credentials) -> Result<PreLoginReceipt> {
        debug!("Submitting credentials");
        let request = ApiRequest::post_json(
            wire::PRE_LOGIN,
            &wire::PreLoginRequest {
                email: credentials.email().as_str(),
                password: credentials.password().expose(),
            },
        )?;

        let response = self.send_raw(&request).await?;
        // `data` is absent when the server has nothing to echo
        let envelope: Envelope<Option<PreLoginData>> =
            handle_response(&response, "login failed")?;

        Ok(PreLoginReceipt {
            message: envelope.message,
            echoed_code: envelope
                .data
                .and_then(|data| data.otp)
                .and_then(|code| OtpCode::new(code).ok()),
        })
    }

    #[instrument(skip_all, fields(email = %email))]
    async fn verify_otp(&self, email: &Email, code: &OtpCode) -> Result<Identity> {
        debug!("Submitting verification code");
        let request = ApiRequest::post_json(
            wire::VERIFY_OTP,
            &wire::VerifyOtpRequest {
                email: email.as_str(),
                otp: code.as_str(),
            },
        )?;

        let response = self.send_raw(&request).await?;
        let envelope: Envelope<UserData<Identity>> =
            handle_response(&response, "invalid verification code")?;
        Ok(envelope.data.user)
    }

    #[instrument(skip(self))]
    async fn who_am_i(&self) -> Result<Identity> {
        let response = self.send_authed(&ApiRequest::get(wire::WHO_AM_I)).await?;
        let envelope: Envelope<UserData<Identity>> =
            handle_response(&response, "failed to load session")?;
        Ok(envelope.data.user)
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<()> {
        let response = self.send_authed(&ApiRequest::post(wire::LOGOUT)).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(response.protocol_error("logout failed")))
        }
    }

    #[instrument(skip_all, fields(email = %registration.email()))]
    async fn register(&self, registration: &Registration) -> Result<RegisteredUser> {
        debug!("Registering professional account");
        let request = ApiRequest::post_json(
            wire::REGISTER,
            &wire::RegisterRequest {
                name: registration.name(),
                email: registration.email().as_str(),
                phone_number: registration.phone_number(),
                document_number: registration.document_number(),
                password: registration.password().expose(),
            },
        )?;

        let response = self.send_raw(&request).await?;
        let envelope: Envelope<UserData<RegisteredUser>> =
            handle_response(&response, "registration failed")?;
        Ok(envelope.data.user)
    }
}

impl<T> Clone for AuthService<T> {
    fn clone(&self) -> Self {
        Self {
            raw: Arc::clone(&self.raw),
            authed: self.authed.clone(),
        }
    }
}

impl<T> std::fmt::Debug for AuthService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("authed", &self.authed)
            .finish_non_exhaustive()
    }
}
