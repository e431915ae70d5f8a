//! Role tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// The role carried by an identity.
///
/// Roles are a closed set and are only ever compared for membership;
/// there is no hierarchy or inheritance between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Administrator,
    Coordinator,
    Professional,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 3] = [Role::Administrator, Role::Coordinator, Role::Professional];

    /// The wire tag for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "ADMINISTRATOR",
            Role::Coordinator => "COORDINATOR",
            Role::Professional => "PROFESSIONAL",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                InvalidInputError::Role {
                    value: s.to_string(),
                }
                .into()
            })
    }
}
