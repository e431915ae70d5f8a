//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use academy_core::SessionStore;
use academy_http::ClientConfig;

use super::connect_stored;
use crate::credential::storage;
use crate::output;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, config: ClientConfig) -> Result<()> {
    let service = connect_stored(&config)?;
    let store = SessionStore::global();

    eprintln!("{}", "Logging out...".dimmed());

    // The service may be unreachable or reject the call; the local
    // credential goes either way.
    store.clear(&service).await;
    storage::clear().context("Failed to remove stored credential")?;

    output::success("Logged out");

    Ok(())
}
