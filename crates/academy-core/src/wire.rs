//! Endpoint definitions and the request/response values a [`Transport`]
//! moves.
//!
//! Requests are plain values so that the authenticated transport can
//! re-issue one after a refresh without the caller's help.
//!
//! [`Transport`]: crate::Transport

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ProtocolError, TransportError};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Password check that provisions a one-time code.
pub const PRE_LOGIN: &str = "/auth/login";

/// One-time code check that issues the session credential.
pub const VERIFY_OTP: &str = "/auth/verify-otp-login";

/// Exchanges the ambient refresh credential for a fresh one.
pub const REFRESH: &str = "/auth/refresh";

/// Resolves the ambient credential into an identity.
pub const WHO_AM_I: &str = "/auth/me";

/// Revokes the ambient credential.
pub const LOGOUT: &str = "/auth/logout";

/// Professional self-registration.
pub const REGISTER: &str = "/auth/register";

// ============================================================================
// Request / Response
// ============================================================================

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// An outbound request, relative to the API base.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// A GET request with no body.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// A POST request with no body.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: None,
        }
    }

    /// A POST request with a JSON body.
    pub fn post_json<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, Error> {
        let body = serde_json::to_value(body).map_err(|e| TransportError::Http {
            message: format!("failed to encode request body: {e}"),
        })?;
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

// Bodies carry passwords and codes
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("body", &self.body.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A response as received, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns true for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the credential was rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Decode the `data` member of a success envelope.
    pub fn data<T: DeserializeOwned>(&self) -> Result<Envelope<T>, Error> {
        serde_json::from_slice(&self.body).map_err(|e| {
            TransportError::Decode {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Build the protocol error for a non-success response.
    ///
    /// Uses the body's `message` when present, otherwise `fallback`.
    pub fn protocol_error(&self, fallback: &str) -> ProtocolError {
        let message = serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        ProtocolError::new(self.status, message)
    }
}

/// The service's success envelope: `{ "message": ..., "data": ... }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// Error body format.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// Payloads
// ============================================================================

/// Request body for pre-login.
#[derive(Debug, Serialize)]
pub(crate) struct PreLoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `data` of the pre-login response.
#[derive(Debug, Deserialize)]
pub(crate) struct PreLoginData {
    #[serde(default)]
    pub otp: Option<String>,
}

/// Request body for verify-otp.
#[derive(Debug, Serialize)]
pub(crate) struct VerifyOtpRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

/// Request body for register.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub document_number: &'a str,
    pub password: &'a str,
}

/// `data` of any response that carries a user.
#[derive(Debug, Deserialize)]
pub(crate) struct UserData<T> {
    pub user: T,
}
