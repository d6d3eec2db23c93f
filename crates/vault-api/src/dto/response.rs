//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::types::{FolderId, ItemId, UserId};
use vault_entity::{AccessLevel, AccessibleFolder, AccessibleItem, Grant, ItemSummary};

use super::encoding::base64_bytes;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Which store backend answered the ping.
    pub store: String,
}

/// Result of creating a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedFolderResponse {
    pub id: FolderId,
    pub parent_id: Option<FolderId>,
}

/// Result of creating an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedItemResponse {
    pub id: ItemId,
}

/// A folder as seen by the caller, with the caller's wrapped key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderResponse {
    pub id: FolderId,
    pub owner_id: UserId,
    pub parent_id: Option<FolderId>,
    #[serde(with = "base64_bytes")]
    pub enc_name: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub name_nonce: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub wrapped_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub key_nonce: Vec<u8>,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccessibleFolder> for FolderResponse {
    fn from(row: AccessibleFolder) -> Self {
        Self {
            id: row.folder.id,
            owner_id: row.folder.owner_id,
            parent_id: row.folder.parent_id,
            enc_name: row.folder.enc_name,
            name_nonce: row.folder.nonce,
            wrapped_key: row.wrapped_key,
            key_nonce: row.key_nonce,
            access_level: row.access_level,
            created_at: row.folder.created_at,
            updated_at: row.folder.updated_at,
        }
    }
}

/// An item with its full data, as seen by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: ItemId,
    pub owner_id: UserId,
    pub folder_id: Option<FolderId>,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(with = "base64_bytes")]
    pub enc_data: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub data_nonce: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub enc_overview: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub overview_nonce: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub wrapped_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub key_nonce: Vec<u8>,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccessibleItem> for ItemResponse {
    fn from(row: AccessibleItem) -> Self {
        Self {
            id: row.item.id,
            owner_id: row.item.owner_id,
            folder_id: row.item.folder_id,
            item_type: row.item.item_type,
            enc_data: row.item.enc_data,
            data_nonce: row.item.data_nonce,
            enc_overview: row.item.enc_overview,
            overview_nonce: row.item.overview_nonce,
            wrapped_key: row.wrapped_key,
            key_nonce: row.key_nonce,
            access_level: row.access_level,
            created_at: row.item.created_at,
            updated_at: row.item.updated_at,
        }
    }
}

/// A list-view item row. Only the overview blob is included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSummaryResponse {
    pub id: ItemId,
    pub owner_id: UserId,
    pub folder_id: Option<FolderId>,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(with = "base64_bytes")]
    pub enc_overview: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub overview_nonce: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub wrapped_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub key_nonce: Vec<u8>,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemSummary> for ItemSummaryResponse {
    fn from(row: ItemSummary) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            folder_id: row.folder_id,
            item_type: row.item_type,
            enc_overview: row.enc_overview,
            overview_nonce: row.overview_nonce,
            wrapped_key: row.wrapped_key,
            key_nonce: row.key_nonce,
            access_level: row.access_level,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One grant on a resource. Key material is never listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantResponse {
    pub user_id: UserId,
    pub access_level: AccessLevel,
    pub granted_at: DateTime<Utc>,
}

impl From<Grant> for GrantResponse {
    fn from(grant: Grant) -> Self {
        Self {
            user_id: grant.user_id,
            access_level: grant.access_level,
            granted_at: grant.created_at,
        }
    }
}
