//! Resource kind discriminator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use vault_core::AppError;

/// The two resource variants that carry grants.
///
/// Serialized lowercase; the uppercase spellings are accepted on input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "resource_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A folder.
    #[serde(alias = "FOLDER", alias = "Folder")]
    Folder,
    /// An item.
    #[serde(alias = "ITEM", alias = "Item")]
    Item,
}

impl ResourceKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "folder" | "folders" => Ok(Self::Folder),
            "item" | "items" => Ok(Self::Item),
            _ => Err(AppError::validation(format!("Invalid resource kind: '{s}'"))),
        }
    }
}
