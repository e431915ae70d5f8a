//! Core traits for transport and authentication behavior.

mod auth_api;
mod transport;

pub use auth_api::{AuthApi, PreLoginReceipt};
pub use transport::Transport;
