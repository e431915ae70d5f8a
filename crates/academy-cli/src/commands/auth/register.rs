//! Register command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use academy_core::{AuthApi, Email, Password, Registration};
use academy_http::ClientConfig;

use super::connect_fresh;
use crate::output;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Account email
    #[arg(long)]
    pub email: String,

    /// Contact phone number
    #[arg(long)]
    pub phone: String,

    /// Identity document number
    #[arg(long)]
    pub document: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Account password, again
    #[arg(long)]
    pub confirm_password: String,
}

pub async fn run(args: RegisterArgs, config: ClientConfig) -> Result<()> {
    if args.password != args.confirm_password {
        bail!("Passwords do not match");
    }

    let email = Email::new(&args.email).context("Invalid email")?;
    let registration = Registration::new(
        args.name,
        email,
        args.phone,
        args.document,
        Password::new(args.password),
    )?;

    let service = connect_fresh(&config)?;

    eprintln!("{}", "Registering...".dimmed());

    let user = service
        .register(&registration)
        .await
        .context("Registration failed")?;

    output::success("Registration submitted");
    output::field("Name", &user.name);
    output::field("Email", &user.email);
    output::field("Role", user.role.as_str());
    eprintln!(
        "{}",
        "An administrator must approve the account before it can log in.".dimmed()
    );

    Ok(())
}
