//! Refresh command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use academy_core::SessionStore;
use academy_http::ClientConfig;

use super::{connect_stored, save_credential};
use crate::output;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, config: ClientConfig) -> Result<()> {
    let service = connect_stored(&config)?;

    eprintln!("{}", "Refreshing session...".dimmed());

    // A refused refresh ends the session.
    SessionStore::global()
        .observe(service.refresh().await)
        .context("Failed to refresh session")?;

    save_credential(&service)?;

    output::success("Session refreshed successfully");

    Ok(())
}
