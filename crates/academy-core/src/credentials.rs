//! Login, verification and registration inputs.
//!
//! Every secret here is hidden from `Debug` output so that a stray
//! `?value` in a tracing span cannot leak it.

use std::fmt;

use crate::error::{Error, InvalidInputError};
use crate::types::Email;

/// An account password.
///
/// # Security
///
/// Never exposed in Debug output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wrap a password. Whitespace is significant and kept as typed.
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Returns true if nothing was entered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Use only when building a request body.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&"[REDACTED]").finish()
    }
}

/// A one-time verification code from the second login step.
///
/// # Security
///
/// Never exposed in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Longest code accepted; the service issues six digits.
    pub const MAX_LEN: usize = 12;

    /// Create a code, checking presence and shape.
    pub fn new(code: impl AsRef<str>) -> Result<Self, Error> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(InvalidInputError::Missing {
                field: "verification code",
            }
            .into());
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidInputError::OtpCode {
                reason: "only letters and digits are allowed".to_string(),
            }
            .into());
        }
        if code.len() > Self::MAX_LEN {
            return Err(InvalidInputError::OtpCode {
                reason: format!("longer than {} characters", Self::MAX_LEN),
            }
            .into());
        }
        Ok(Self(code.to_string()))
    }

    /// Returns the code.
    ///
    /// # Security
    ///
    /// Use only to send it to the verify endpoint, or to show a code the
    /// server echoed back in development mode.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OtpCode").field(&"[REDACTED]").finish()
    }
}

/// Email and password for the first login step.
#[derive(Clone)]
pub struct Credentials {
    email: Email,
    password: Password,
}

impl Credentials {
    /// Create new credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the password is empty.
    pub fn new(email: Email, password: Password) -> Result<Self, Error> {
        if password.is_empty() {
            return Err(InvalidInputError::Missing { field: "password" }.into());
        }
        Ok(Self { email, password })
    }

    /// Returns the email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    pub(crate) fn password(&self) -> &Password {
        &self.password
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Fields for self-registration of a professional account.
#[derive(Clone)]
pub struct Registration {
    name: String,
    email: Email,
    phone_number: String,
    document_number: String,
    password: Password,
}

impl Registration {
    /// Create a registration, checking every field is present.
    pub fn new(
        name: impl Into<String>,
        email: Email,
        phone_number: impl Into<String>,
        document_number: impl Into<String>,
        password: Password,
    ) -> Result<Self, Error> {
        let name = required("name", name.into())?;
        let phone_number = required("phone number", phone_number.into())?;
        let document_number = required("document number", document_number.into())?;
        if password.is_empty() {
            return Err(InvalidInputError::Missing { field: "password" }.into());
        }

        Ok(Self {
            name,
            email,
            phone_number,
            document_number,
            password,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn document_number(&self) -> &str {
        &self.document_number
    }

    pub(crate) fn password(&self) -> &Password {
        &self.password
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("document_number", &self.document_number)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn required(field: &'static str, value: String) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InvalidInputError::Missing { field }.into());
    }
    Ok(trimmed.to_string())
}
