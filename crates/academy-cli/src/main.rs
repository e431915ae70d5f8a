//! academy - command-line client for the academy coordination service.
//!
//! A thin wrapper over `academy-core` and `academy-http`, mostly useful for
//! exercising the login flow and access rules against a running service.

mod cli;
mod commands;
mod credential;
mod output;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use academy_core::SessionStore;

use cli::{Cli, Commands};
use commands::auth;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    SessionStore::install_global(SessionStore::new())
        .map_err(|_| anyhow!("session store installed twice"))?;

    let config = cli.client_config();
    match cli.command {
        Commands::Auth(auth_cmd) => auth::handle(auth_cmd, config).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output on stdout stays machine-readable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
