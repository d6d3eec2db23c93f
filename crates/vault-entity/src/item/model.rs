//! Item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vault_core::types::{FolderId, ItemId, UserId};

use crate::access::AccessLevel;

/// An encrypted item (login, note, card, ...).
///
/// Items carry two blobs: the full data, and a small overview used to render
/// lists without fetching every item's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Current owner.
    pub owner_id: UserId,
    /// Containing folder (None when unfiled).
    pub folder_id: Option<FolderId>,
    /// Opaque client-defined type tag.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub item_type: String,
    pub enc_data: Vec<u8>,
    pub data_nonce: Vec<u8>,
    pub enc_overview: Vec<u8>,
    pub overview_nonce: Vec<u8>,
    /// Soft-delete flag.
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every payload mutation.
    pub updated_at: DateTime<Utc>,
}

/// Encrypted item payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPayload {
    pub enc_data: Vec<u8>,
    pub data_nonce: Vec<u8>,
    pub enc_overview: Vec<u8>,
    pub overview_nonce: Vec<u8>,
}

/// Data required to insert an item row.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub id: ItemId,
    pub owner_id: UserId,
    pub folder_id: Option<FolderId>,
    pub item_type: String,
    pub payload: ItemPayload,
}

/// An item together with the requesting user's own grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AccessibleItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: Item,
    /// Item key wrapped for the requesting user.
    pub wrapped_key: Vec<u8>,
    pub key_nonce: Vec<u8>,
    pub access_level: AccessLevel,
}

/// A list-view row: the overview blob and the caller's grant, without the
/// full data blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ItemSummary {
    pub id: ItemId,
    pub owner_id: UserId,
    pub folder_id: Option<FolderId>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub item_type: String,
    pub enc_overview: Vec<u8>,
    pub overview_nonce: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub wrapped_key: Vec<u8>,
    pub key_nonce: Vec<u8>,
    pub access_level: AccessLevel,
}

impl From<AccessibleItem> for ItemSummary {
    fn from(row: AccessibleItem) -> Self {
        Self {
            id: row.item.id,
            owner_id: row.item.owner_id,
            folder_id: row.item.folder_id,
            item_type: row.item.item_type,
            enc_overview: row.item.enc_overview,
            overview_nonce: row.item.overview_nonce,
            created_at: row.item.created_at,
            updated_at: row.item.updated_at,
            wrapped_key: row.wrapped_key,
            key_nonce: row.key_nonce,
            access_level: row.access_level,
        }
    }
}
