//! Core academy types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod api_url;
mod email;
mod role;

pub use api_url::ApiUrl;
pub use email::Email;
pub use role::Role;
