//! Auth subcommand implementations.

mod can_access;
mod login;
mod logout;
mod refresh;
mod register;
mod whoami;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};

use academy_core::AuthService;
use academy_http::{ClientConfig, HttpTransport};

use crate::credential::{StoredCredential, storage};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in with email, password and a one-time code
    Login(login::LoginArgs),

    /// Log out and forget the stored credential
    Logout(logout::LogoutArgs),

    /// Display the logged-in identity
    Whoami(whoami::WhoamiArgs),

    /// Exchange the stored credential for a fresh one
    Refresh(refresh::RefreshArgs),

    /// Register a professional account
    Register(register::RegisterArgs),

    /// Check whether the logged-in identity may open a screen
    CanAccess(can_access::CanAccessArgs),
}

pub async fn handle(cmd: AuthCommand, config: ClientConfig) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, config).await,
        AuthSubcommand::Logout(args) => logout::run(args, config).await,
        AuthSubcommand::Whoami(args) => whoami::run(args, config).await,
        AuthSubcommand::Refresh(args) => refresh::run(args, config).await,
        AuthSubcommand::Register(args) => register::run(args, config).await,
        AuthSubcommand::CanAccess(args) => can_access::run(args, config).await,
    }
}

/// Connect without any stored credential.
fn connect_fresh(config: &ClientConfig) -> Result<AuthService<HttpTransport>> {
    academy_http::connect(config).context("Failed to create HTTP client")
}

/// Connect and put the stored credential back into the cookie jar.
///
/// A credential saved for a different API base is ignored.
fn connect_stored(config: &ClientConfig) -> Result<AuthService<HttpTransport>> {
    let service = connect_fresh(config)?;
    match storage::load().context("Failed to load stored credential")? {
        Some(stored) if stored.api == config.api.as_str() => {
            service.transport().restore_cookies(&stored.cookies);
        }
        Some(stored) => {
            warn!(stored = %stored.api, current = %config.api, "Stored credential is for another API, ignoring it");
        }
        None => debug!("No stored credential"),
    }
    Ok(service)
}

/// Persist whatever cookies the service holds for us now.
fn save_credential(service: &AuthService<HttpTransport>) -> Result<()> {
    let transport = service.transport();
    storage::save(&StoredCredential {
        api: transport.api().as_str().to_string(),
        cookies: transport.export_cookies(),
    })
    .context("Failed to save credential")
}

/// Line-oriented prompts on stdin.
pub(crate) struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Ask for one line, returned as typed. Prompts go to stderr.
    pub async fn ask(&mut self, label: &str) -> Result<String> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(format!("{label}: ").as_bytes()).await?;
        stderr.flush().await?;

        let line = self
            .lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
            .with_context(|| format!("No input for {}", label.to_lowercase()))?;
        Ok(line)
    }
}
