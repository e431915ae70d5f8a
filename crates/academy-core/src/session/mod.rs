//! Session state and the process-wide store that owns it.

mod state;
mod store;

pub use state::Session;
pub use store::SessionStore;
