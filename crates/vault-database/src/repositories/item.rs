//! Item repository.

use sqlx::PgExecutor;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::types::{FolderId, ItemId, UserId};
use vault_entity::{AccessibleItem, Item, ItemPayload, ItemSummary, NewItem};

const ACCESSIBLE_COLUMNS: &str = "i.id, i.owner_id, i.folder_id, i.type, i.enc_data, i.data_nonce, \
     i.enc_overview, i.overview_nonce, i.deleted, i.created_at, i.updated_at, \
     k.enc_key AS wrapped_key, k.nonce AS key_nonce, k.access_level";

const SUMMARY_COLUMNS: &str = "i.id, i.owner_id, i.folder_id, i.type, i.enc_overview, \
     i.overview_nonce, i.created_at, i.updated_at, \
     k.enc_key AS wrapped_key, k.nonce AS key_nonce, k.access_level";

/// Queries over the `items` table.
#[derive(Debug, Clone, Copy)]
pub struct ItemRepository;

impl ItemRepository {
    /// Insert an item row.
    pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, data: &NewItem) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            "INSERT INTO items \
             (id, owner_id, folder_id, type, enc_data, data_nonce, enc_overview, overview_nonce) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.id)
        .bind(data.owner_id)
        .bind(data.folder_id)
        .bind(&data.item_type)
        .bind(&data.payload.enc_data)
        .bind(&data.payload.data_nonce)
        .bind(&data.payload.enc_overview)
        .bind(&data.payload.overview_nonce)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert item", e))
    }

    /// Non-deleted items in `folder_id` (unfiled when `None`) that the user
    /// holds a grant on. The full data blob is not selected.
    pub async fn list_for_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<ItemSummary>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM items i \
             JOIN resource_keys k ON k.resource_id = i.id AND k.resource_kind = 'item' \
             WHERE k.user_id = $1 AND i.deleted = FALSE \
             AND i.folder_id IS NOT DISTINCT FROM $2 \
             ORDER BY i.id"
        );
        sqlx::query_as::<_, ItemSummary>(&sql)
            .bind(user_id)
            .bind(folder_id)
            .fetch_all(executor)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list items", e))
    }

    /// A single non-deleted item with the user's grant, if one exists.
    pub async fn find_with_access<'e, E: PgExecutor<'e>>(
        executor: E,
        id: ItemId,
        user_id: UserId,
    ) -> AppResult<Option<AccessibleItem>> {
        let sql = format!(
            "SELECT {ACCESSIBLE_COLUMNS} FROM items i \
             JOIN resource_keys k ON k.resource_id = i.id AND k.resource_kind = 'item' \
             WHERE i.id = $1 AND k.user_id = $2 AND i.deleted = FALSE"
        );
        sqlx::query_as::<_, AccessibleItem>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find item", e))
    }

    /// Replace the encrypted blobs when `user_id` holds WRITE or OWNER.
    pub async fn update_payload<'e, E: PgExecutor<'e>>(
        executor: E,
        id: ItemId,
        user_id: UserId,
        payload: &ItemPayload,
    ) -> AppResult<u64> {
        sqlx::query(
            "UPDATE items i SET enc_data = $3, data_nonce = $4, enc_overview = $5, \
             overview_nonce = $6, updated_at = NOW() \
             WHERE i.id = $1 AND i.deleted = FALSE AND EXISTS ( \
                 SELECT 1 FROM resource_keys k \
                 WHERE k.resource_id = i.id AND k.resource_kind = 'item' \
                 AND k.user_id = $2 AND k.access_level IN ('OWNER', 'WRITE'))",
        )
        .bind(id)
        .bind(user_id)
        .bind(&payload.enc_data)
        .bind(&payload.data_nonce)
        .bind(&payload.enc_overview)
        .bind(&payload.overview_nonce)
        .execute(executor)
        .await
        .map(|r| r.rows_affected())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update item", e))
    }
}
