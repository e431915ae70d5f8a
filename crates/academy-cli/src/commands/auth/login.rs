//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use academy_core::{AuthService, Error, Identity, LoginFlow, OtpCode, Password, SessionStore};
use academy_http::{ClientConfig, HttpTransport};

use super::{Prompt, connect_fresh, save_credential};
use crate::output;

/// Typed at the code prompt to go back and re-enter the password.
const BACK: &str = ":back";

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email (prompted for if omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// Account password (prompted for if omitted)
    #[arg(long, env = "ACADEMY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// One-time code; when given, a wrong code fails instead of re-prompting
    #[arg(long)]
    pub otp: Option<String>,

    /// Print the code if the service echoes it back (development servers only)
    #[arg(long)]
    pub show_dev_code: bool,
}

enum CodeStep {
    Established(Identity),
    Back,
}

pub async fn run(args: LoginArgs, config: ClientConfig) -> Result<()> {
    let service = connect_fresh(&config)?;
    let store = SessionStore::global();
    let mut prompt = Prompt::new();
    let mut flow = LoginFlow::new();

    let mut email = args.email;
    let mut password = args.password;
    let mut otp = args.otp;

    let identity = loop {
        let entered_email = match email.take() {
            Some(email) => email,
            None => prompt.ask("Email").await?,
        };
        // A password from the command line gets one attempt.
        let interactive = password.is_none();
        let entered_password = match password.take() {
            Some(password) => password,
            None => prompt.ask("Password").await?,
        };
        flow.set_email(entered_email)?;
        flow.set_password(Password::new(entered_password))?;

        eprintln!("{}", "Checking credentials...".dimmed());
        let receipt = match flow.submit_credentials(&service).await {
            Ok(receipt) => receipt,
            Err(e) if interactive => {
                output::error(flow.last_error().unwrap_or("Login failed"));
                // Keep a well-formed email and only ask for the password again.
                if !matches!(e, Error::InvalidInput(_)) {
                    email = Some(flow.email().to_string());
                }
                continue;
            }
            Err(e) => return Err(e).context("Login failed"),
        };

        if !receipt.message.is_empty() {
            eprintln!("{}", receipt.message);
        }
        if let Some(code) = receipt.echoed_code {
            if args.show_dev_code {
                output::field("Development code", code.as_str());
            } else {
                tracing::debug!("Service echoed the one-time code; pass --show-dev-code to print it");
            }
        }

        match enter_code(&mut flow, &service, store, &mut prompt, otp.take()).await? {
            CodeStep::Established(identity) => break identity,
            CodeStep::Back => email = Some(flow.email().to_string()),
        }
    };

    save_credential(&service)?;

    output::success("Logged in successfully");
    println!();
    output::identity(&identity);

    Ok(())
}

/// Collect and submit codes until one is accepted or the user goes back.
///
/// A code passed on the command line gets exactly one attempt.
async fn enter_code(
    flow: &mut LoginFlow,
    service: &AuthService<HttpTransport>,
    store: &SessionStore,
    prompt: &mut Prompt,
    mut preset: Option<String>,
) -> Result<CodeStep> {
    loop {
        let interactive = preset.is_none();
        let input = match preset.take() {
            Some(code) => code,
            None => prompt.ask("Verification code (:back to start over)").await?,
        };

        if interactive && input.trim() == BACK {
            flow.back_to_credentials()?;
            return Ok(CodeStep::Back);
        }

        let attempt = match OtpCode::new(&input) {
            Ok(code) => {
                flow.set_code(code)?;
                flow.submit_otp(service, store).await
            }
            Err(e) => Err(e),
        };

        match attempt {
            Ok(identity) => return Ok(CodeStep::Established(identity)),
            Err(e) if interactive => output::error(&e.user_message()),
            Err(e) => return Err(e).context("Verification failed"),
        }
    }
}
