//! Request DTOs with validation.
//!
//! Blob fields travel as base64 text and are never interpreted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use vault_core::types::{FolderId, UserId};
use vault_entity::{AccessLevel, ResourceKind};

use super::encoding::base64_bytes;

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Parent folder; absent or nil means root.
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "enc_name is required"))]
    pub enc_name: Vec<u8>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "name_nonce is required"))]
    pub name_nonce: Vec<u8>,
    /// Folder key wrapped for the creator.
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "enc_key is required"))]
    pub enc_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "key_nonce is required"))]
    pub key_nonce: Vec<u8>,
}

/// Update folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "enc_name is required"))]
    pub enc_name: Vec<u8>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "name_nonce is required"))]
    pub name_nonce: Vec<u8>,
}

/// Create item request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemRequest {
    /// Containing folder; absent or nil means unfiled.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// Client-defined item type tag.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64))]
    pub item_type: String,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "enc_data is required"))]
    pub enc_data: Vec<u8>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "data_nonce is required"))]
    pub data_nonce: Vec<u8>,
    /// Small blob rendered in list views.
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "enc_overview is required"))]
    pub enc_overview: Vec<u8>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "overview_nonce is required"))]
    pub overview_nonce: Vec<u8>,
    /// Item key wrapped for the creator.
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "enc_key is required"))]
    pub enc_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "key_nonce is required"))]
    pub key_nonce: Vec<u8>,
}

/// Update item request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "enc_data is required"))]
    pub enc_data: Vec<u8>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "data_nonce is required"))]
    pub data_nonce: Vec<u8>,
    /// Small blob rendered in list views.
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "enc_overview is required"))]
    pub enc_overview: Vec<u8>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "overview_nonce is required"))]
    pub overview_nonce: Vec<u8>,
}

/// Query parameters for listing items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListItemsQuery {
    /// Folder to list; absent, empty, or nil lists unfiled items.
    pub folder_id: Option<String>,
}

/// Share a resource with another user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShareRequest {
    pub target_user_id: UserId,
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    /// Resource key re-wrapped for the target.
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "enc_key is required"))]
    pub enc_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    #[validate(length(min = 1, message = "key_nonce is required"))]
    pub key_nonce: Vec<u8>,
    pub access_level: AccessLevel,
}

/// Revoke a user's access. Without `resource_kind` the server checks
/// folders first, then items.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RevokeRequest {
    pub target_user_id: UserId,
    pub resource_id: Uuid,
    #[serde(default)]
    pub resource_kind: Option<ResourceKind>,
}
