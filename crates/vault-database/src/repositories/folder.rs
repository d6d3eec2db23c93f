//! Folder repository.

use sqlx::PgExecutor;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::types::{FolderId, UserId};
use vault_entity::{AccessibleFolder, Folder, FolderPayload, NewFolder};

const ACCESSIBLE_COLUMNS: &str = "f.id, f.owner_id, f.parent_id, f.enc_name, f.nonce, f.deleted, \
     f.created_at, f.updated_at, k.enc_key AS wrapped_key, k.nonce AS key_nonce, k.access_level";

/// Queries over the `folders` table.
#[derive(Debug, Clone, Copy)]
pub struct FolderRepository;

impl FolderRepository {
    /// Insert a folder row.
    pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, data: &NewFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, owner_id, parent_id, enc_name, nonce) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.id)
        .bind(data.owner_id)
        .bind(data.parent_id)
        .bind(&data.payload.enc_name)
        .bind(&data.payload.nonce)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert folder", e))
    }

    /// Every non-deleted folder the user holds a grant on, with that grant.
    pub async fn list_for_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: UserId,
    ) -> AppResult<Vec<AccessibleFolder>> {
        let sql = format!(
            "SELECT {ACCESSIBLE_COLUMNS} FROM folders f \
             JOIN resource_keys k ON k.resource_id = f.id AND k.resource_kind = 'folder' \
             WHERE k.user_id = $1 AND f.deleted = FALSE \
             ORDER BY f.id"
        );
        sqlx::query_as::<_, AccessibleFolder>(&sql)
            .bind(user_id)
            .fetch_all(executor)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// A single non-deleted folder with the user's grant, if one exists.
    pub async fn find_with_access<'e, E: PgExecutor<'e>>(
        executor: E,
        id: FolderId,
        user_id: UserId,
    ) -> AppResult<Option<AccessibleFolder>> {
        let sql = format!(
            "SELECT {ACCESSIBLE_COLUMNS} FROM folders f \
             JOIN resource_keys k ON k.resource_id = f.id AND k.resource_kind = 'folder' \
             WHERE f.id = $1 AND k.user_id = $2 AND f.deleted = FALSE"
        );
        sqlx::query_as::<_, AccessibleFolder>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Replace the encrypted name when `user_id` holds WRITE or OWNER.
    pub async fn update_payload<'e, E: PgExecutor<'e>>(
        executor: E,
        id: FolderId,
        user_id: UserId,
        payload: &FolderPayload,
    ) -> AppResult<u64> {
        sqlx::query(
            "UPDATE folders f SET enc_name = $3, nonce = $4, updated_at = NOW() \
             WHERE f.id = $1 AND f.deleted = FALSE AND EXISTS ( \
                 SELECT 1 FROM resource_keys k \
                 WHERE k.resource_id = f.id AND k.resource_kind = 'folder' \
                 AND k.user_id = $2 AND k.access_level IN ('OWNER', 'WRITE'))",
        )
        .bind(id)
        .bind(user_id)
        .bind(&payload.enc_name)
        .bind(&payload.nonce)
        .execute(executor)
        .await
        .map(|r| r.rows_affected())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update folder", e))
    }
}
