//! Two-step login: password first, then a one-time code.

use tracing::{debug, info, instrument};

use crate::Result;
use crate::credentials::{Credentials, OtpCode, Password};
use crate::error::{AuthError, Error, InvalidInputError};
use crate::identity::Identity;
use crate::session::SessionStore;
use crate::traits::{AuthApi, PreLoginReceipt};
use crate::types::Email;

/// Where a login attempt currently stands.
///
/// The OTP step can only hold an email that already passed the password
/// check, so "verifying a code for nobody" cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStep {
    /// Collecting email and password.
    Credentials { email: String, password: Password },
    /// Password accepted; collecting the one-time code.
    Otp { email: Email, code: Option<OtpCode> },
    /// Code accepted and the session established. Terminal.
    Established { identity: Identity },
}

impl LoginStep {
    /// Short name of the step, used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            LoginStep::Credentials { .. } => "credentials",
            LoginStep::Otp { .. } => "otp",
            LoginStep::Established { .. } => "established",
        }
    }
}

/// One login attempt.
///
/// Only a successful [`submit_otp`](Self::submit_otp) touches the
/// session store; abandoning the flow at any earlier point leaves no
/// session state behind. Failures keep the flow in its current step and
/// are both returned and kept in [`last_error`](Self::last_error) for
/// display.
#[derive(Debug, Clone)]
pub struct LoginFlow {
    step: LoginStep,
    last_error: Option<String>,
}

impl LoginFlow {
    /// Start a fresh attempt with empty fields.
    pub fn new() -> Self {
        Self {
            step: LoginStep::Credentials {
                email: String::new(),
                password: Password::default(),
            },
            last_error: None,
        }
    }

    pub fn step(&self) -> &LoginStep {
        &self.step
    }

    /// The email as entered or carried over; once established, the
    /// identity's email.
    pub fn email(&self) -> &str {
        match &self.step {
            LoginStep::Credentials { email, .. } => email,
            LoginStep::Otp { email, .. } => email.as_str(),
            LoginStep::Established { identity } => &identity.email,
        }
    }

    /// Message from the most recent failed submission, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_established(&self) -> bool {
        matches!(self.step, LoginStep::Established { .. })
    }

    /// Edit the email field.
    pub fn set_email(&mut self, value: impl Into<String>) -> Result<()> {
        match &mut self.step {
            LoginStep::Credentials { email, .. } => {
                *email = value.into();
                Ok(())
            }
            other => Err(mismatch("credentials", other)),
        }
    }

    /// Edit the password field.
    pub fn set_password(&mut self, value: Password) -> Result<()> {
        match &mut self.step {
            LoginStep::Credentials { password, .. } => {
                *password = value;
                Ok(())
            }
            other => Err(mismatch("credentials", other)),
        }
    }

    /// Edit the code field.
    pub fn set_code(&mut self, value: OtpCode) -> Result<()> {
        match &mut self.step {
            LoginStep::Otp { code, .. } => {
                *code = Some(value);
                Ok(())
            }
            other => Err(mismatch("otp", other)),
        }
    }

    /// Submit email and password.
    ///
    /// On success the flow moves to the OTP step carrying the email. On
    /// failure it stays where it is with the fields untouched.
    #[instrument(skip_all, fields(email = %self.email()))]
    pub async fn submit_credentials<A>(&mut self, api: &A) -> Result<PreLoginReceipt>
    where
        A: AuthApi + ?Sized,
    {
        let (email, password) = match &self.step {
            LoginStep::Credentials { email, password } => (email.clone(), password.clone()),
            other => return Err(mismatch("credentials", other)),
        };

        let result = async {
            let credentials = Credentials::new(Email::new(&email)?, password)?;
            let receipt = api.pre_login(&credentials).await?;
            Ok::<_, Error>((credentials.email().clone(), receipt))
        }
        .await;

        match result {
            Ok((email, receipt)) => {
                debug!("Password accepted, awaiting code");
                self.step = LoginStep::Otp { email, code: None };
                self.last_error = None;
                Ok(receipt)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Submit the one-time code.
    ///
    /// On success the identity is established in `store` and the flow
    /// reaches its terminal step. On failure the flow stays in the OTP
    /// step, keeps the email and drops the rejected code.
    #[instrument(skip_all, fields(email = %self.email()))]
    pub async fn submit_otp<A>(&mut self, api: &A, store: &SessionStore) -> Result<Identity>
    where
        A: AuthApi + ?Sized,
    {
        let (email, code) = match &self.step {
            LoginStep::Otp { email, code } => (email.clone(), code.clone()),
            other => return Err(mismatch("otp", other)),
        };
        let Some(code) = code else {
            let missing = InvalidInputError::Missing {
                field: "verification code",
            };
            return Err(self.fail(missing.into()));
        };

        match api.verify_otp(&email, &code).await {
            Ok(identity) => {
                info!(user = identity.id, "Code accepted");
                store.establish(identity.clone());
                self.step = LoginStep::Established {
                    identity: identity.clone(),
                };
                self.last_error = None;
                Ok(identity)
            }
            Err(e) => {
                if let LoginStep::Otp { code, .. } = &mut self.step {
                    *code = None;
                }
                Err(self.fail(e))
            }
        }
    }

    /// Go back from the OTP step to the credentials step.
    ///
    /// The code and the password are discarded; the email is kept.
    pub fn back_to_credentials(&mut self) -> Result<()> {
        match &self.step {
            LoginStep::Otp { email, .. } => {
                let email = email.as_str().to_string();
                self.step = LoginStep::Credentials {
                    email,
                    password: Password::default(),
                };
                self.last_error = None;
                Ok(())
            }
            other => Err(mismatch("otp", other)),
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        debug!(error = %error, step = self.step.name(), "Login step failed");
        self.last_error = Some(error.user_message());
        error
    }
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new()
    }
}

fn mismatch(expected: &'static str, actual: &LoginStep) -> Error {
    AuthError::StepMismatch {
        expected,
        actual: actual.name(),
    }
    .into()
}
