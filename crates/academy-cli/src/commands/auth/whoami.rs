//! Whoami command implementation.

use anyhow::{Result, bail};
use clap::Args;

use academy_core::SessionStore;
use academy_http::ClientConfig;

use super::{connect_stored, save_credential};
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the identity as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: WhoamiArgs, config: ClientConfig) -> Result<()> {
    let service = connect_stored(&config)?;
    let store = SessionStore::global();

    store.bootstrap(&service).await;

    let Some(identity) = store.current().identity().cloned() else {
        bail!("Not logged in. Run 'academy auth login' first.");
    };

    // Bootstrap may have refreshed the credential.
    save_credential(&service)?;

    if args.json {
        output::json_pretty(&identity)?;
    } else {
        output::identity(&identity);
    }

    Ok(())
}
