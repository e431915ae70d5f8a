//! Error types for the academy client core.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for academy operations.
///
/// Callers at the login and session boundary turn these into state
/// transitions or messages; [`Error::user_message`] gives the text to show.
#[derive(Debug, Error)]
pub enum Error {
    /// No response at all (DNS, TLS, connection, timeout, unreadable body).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (expired session, misuse of the login flow).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The service answered with a non-success status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (missing field, malformed email or URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Text suitable for showing to the person at the keyboard.
    ///
    /// Protocol failures surface the server's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            Error::Protocol(err) => err.message().to_string(),
            other => other.to_string(),
        }
    }

    /// Returns true if this error means the session is gone for good:
    /// a call was rejected after a failed refresh, or a refresh itself was
    /// refused.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::SessionExpired | AuthError::RefreshRejected)
        )
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The response body could not be decoded.
    #[error("malformed response body: {message}")]
    Decode { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential was rejected and could not be refreshed.
    #[error("session expired")]
    SessionExpired,

    /// The refresh endpoint refused to issue a new credential.
    #[error("credential refresh rejected")]
    RefreshRejected,

    /// A login flow operation was called in the wrong step.
    #[error("login flow is in the {actual} step, expected {expected}")]
    StepMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Protocol-level errors from non-success responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Message from the server, or a fallback for the failing operation.
    pub message: String,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// A required field was empty.
    #[error("{field} is required")]
    Missing { field: &'static str },

    /// Invalid email shape.
    #[error("invalid email '{value}': {reason}")]
    Email { value: String, reason: String },

    /// Invalid one-time code shape.
    #[error("invalid verification code: {reason}")]
    OtpCode { reason: String },

    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Unknown role tag.
    #[error("unknown role '{value}'")]
    Role { value: String },

    /// Unknown screen name or path.
    #[error("unknown screen '{value}'")]
    Screen { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_text() {
        let err = Error::from(ProtocolError::new(400, "Invalid password"));
        assert_eq!(err.user_message(), "Invalid password");
        assert_eq!(err.to_string(), "protocol error: HTTP 400: Invalid password");
    }

    #[test]
    fn session_expired_is_detected() {
        assert!(Error::from(AuthError::SessionExpired).is_session_expired());
        assert!(Error::from(AuthError::RefreshRejected).is_session_expired());
        assert!(!Error::from(TransportError::Timeout).is_session_expired());
        assert!(!Error::from(ProtocolError::new(401, "Invalid email or password")).is_session_expired());
    }
}
