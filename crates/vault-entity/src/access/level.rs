//! Grant access levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use vault_core::AppError;

/// Access level carried by a grant.
///
/// Owner > Write > Read; each level's capabilities include those below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_level", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessLevel {
    /// Full control: mutate, delete, share, revoke.
    Owner,
    /// May replace the encrypted payload.
    Write,
    /// May only read and unwrap.
    Read,
}

impl AccessLevel {
    /// Check if this level allows payload mutation.
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Owner | Self::Write)
    }

    /// Check if this level allows soft deletion.
    pub fn can_delete(&self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Check if this level allows sharing and revoking.
    pub fn can_share(&self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Return the level as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Write => "WRITE",
            Self::Read => "READ",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OWNER" => Ok(Self::Owner),
            "WRITE" => Ok(Self::Write),
            "READ" => Ok(Self::Read),
            _ => Err(AppError::validation(format!("Invalid access level: '{s}'"))),
        }
    }
}
