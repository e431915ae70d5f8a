//! In-memory `AuthApi` used by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::Result;
use crate::credentials::{Credentials, OtpCode, Registration};
use crate::error::{AuthError, ProtocolError, TransportError};
use crate::identity::{Identity, RegisteredUser};
use crate::traits::{AuthApi, PreLoginReceipt};
use crate::types::{Email, Role};

pub(crate) fn identity(role: Role) -> Identity {
    Identity {
        id: 1,
        name: "Ana Ruiz".to_string(),
        email: "ana@academy.test".to_string(),
        role,
        document_number: "1002003".to_string(),
        phone_number: "3000000000".to_string(),
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    /// Identity for who-am-i and verify; `None` means the credential is rejected.
    pub identity: Option<Identity>,
    pub password: Option<&'static str>,
    pub code: Option<&'static str>,
    pub echo_code: bool,
    pub logout_fails: bool,
    pub pre_login_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub who_am_i_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub last_verified: Mutex<Option<(String, String)>>,
}

impl FakeApi {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            ..Self::default()
        }
    }

    /// Accepts `password` and then `code` for the given identity.
    pub fn accepting(identity: Identity, password: &'static str, code: &'static str) -> Self {
        Self {
            identity: Some(identity),
            password: Some(password),
            code: Some(code),
            ..Self::default()
        }
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn pre_login(&self, credentials: &Credentials) -> Result<PreLoginReceipt> {
        self.pre_login_calls.fetch_add(1, Ordering::SeqCst);
        match self.password {
            Some(password) if credentials.password().expose() == password => {
                Ok(PreLoginReceipt {
                    message: "Code sent".to_string(),
                    echoed_code: match (self.echo_code, self.code) {
                        (true, Some(code)) => Some(OtpCode::new(code)?),
                        _ => None,
                    },
                })
            }
            _ => Err(ProtocolError::new(401, "Invalid email or password").into()),
        }
    }

    async fn verify_otp(&self, email: &Email, code: &OtpCode) -> Result<Identity> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_verified.lock().unwrap() =
            Some((email.as_str().to_string(), code.as_str().to_string()));
        match (self.code, &self.identity) {
            (Some(expected), Some(identity)) if code.as_str() == expected => Ok(identity.clone()),
            _ => Err(ProtocolError::new(400, "Invalid verification code").into()),
        }
    }

    async fn who_am_i(&self) -> Result<Identity> {
        self.who_am_i_calls.fetch_add(1, Ordering::SeqCst);
        self.identity
            .clone()
            .ok_or_else(|| AuthError::SessionExpired.into())
    }

    async fn logout(&self) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails {
            return Err(TransportError::Connection {
                message: "connection reset".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn register(&self, registration: &Registration) -> Result<RegisteredUser> {
        Ok(RegisteredUser {
            id: 99,
            name: registration.name().to_string(),
            email: registration.email().to_string(),
            role: Role::Professional,
        })
    }
}
