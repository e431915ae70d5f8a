//! CLI argument definitions.

use std::time::Duration;

use clap::{Parser, Subcommand};

use academy_core::ApiUrl;
use academy_http::ClientConfig;

use crate::commands::auth::AuthCommand;

/// Command-line client for the academy coordination service.
#[derive(Parser, Debug)]
#[command(name = "academy")]
#[command(author, version = env!("ACADEMY_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Base URL of the service API
    #[arg(long, global = true, env = "ACADEMY_API_URL", default_value = ApiUrl::DEFAULT)]
    pub api: ApiUrl,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api.clone()).with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Login, logout and session inspection
    Auth(AuthCommand),
}
