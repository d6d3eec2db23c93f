//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vault_core::types::{FolderId, UserId};

use crate::access::AccessLevel;

/// An encrypted folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Current owner.
    pub owner_id: UserId,
    /// Containing folder (None at root level).
    pub parent_id: Option<FolderId>,
    /// Encrypted folder name and metadata.
    pub enc_name: Vec<u8>,
    /// Nonce for `enc_name`.
    pub nonce: Vec<u8>,
    /// Soft-delete flag.
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every payload mutation.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root-level folder.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Encrypted folder payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPayload {
    pub enc_name: Vec<u8>,
    pub nonce: Vec<u8>,
}

/// Data required to insert a folder row.
#[derive(Debug, Clone)]
pub struct NewFolder {
    pub id: FolderId,
    pub owner_id: UserId,
    pub parent_id: Option<FolderId>,
    pub payload: FolderPayload,
}

/// A folder together with the requesting user's own grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AccessibleFolder {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub folder: Folder,
    /// Folder key wrapped for the requesting user.
    pub wrapped_key: Vec<u8>,
    pub key_nonce: Vec<u8>,
    pub access_level: AccessLevel,
}
