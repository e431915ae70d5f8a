//! The authenticated user's profile as issued by the service.

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// The authenticated identity for a session.
///
/// Issued by the service on login or by who-am-i, and replaced wholesale
/// on re-login. There are no setters on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub document_number: String,
    pub phone_number: String,
}

impl Identity {
    /// Returns true if this identity's role is one of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

/// The summary returned after a successful registration.
///
/// Newly registered professionals cannot log in until an administrator
/// approves the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}
