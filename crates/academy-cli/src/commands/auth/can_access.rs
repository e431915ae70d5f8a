//! Can-access command implementation.

use anyhow::Result;
use clap::Args;

use academy_core::{Decision, Destination, Gate, Screen, SessionStore, navigate};
use academy_http::ClientConfig;

use super::connect_stored;
use crate::output;

#[derive(Args, Debug)]
pub struct CanAccessArgs {
    /// Screen name (e.g. `users`) or path (e.g. `/professional/grades`)
    pub screen: Screen,
}

pub async fn run(args: CanAccessArgs, config: ClientConfig) -> Result<()> {
    let service = connect_stored(&config)?;
    let store = SessionStore::global();

    let gate = Gate::roles(args.screen.required_roles().iter().copied());
    let mut rx = store.subscribe();
    let ((), decision) = tokio::join!(store.bootstrap(&service), gate.wait(&mut rx));

    let destination = store.with_session(|session| navigate(session, args.screen));

    output::field("Screen", args.screen.path());
    if args.screen.is_public() {
        output::field("Decision", "public");
    } else {
        output::field("Decision", describe(decision));
    }
    match destination {
        Destination::Render(screen) => output::field("Destination", screen.path()),
        Destination::Redirect(screen) => output::field("Redirect", screen.path()),
        Destination::Wait => output::field("Destination", "waiting for session"),
    }

    Ok(())
}

fn describe(decision: Decision) -> &'static str {
    match decision {
        Decision::Allow => "allow",
        Decision::RedirectLogin => "login required",
        Decision::RedirectUnauthorized => "unauthorized",
        Decision::Pending => "pending",
    }
}
