//! Resource key (grant) repository.

use sqlx::PgExecutor;
use uuid::Uuid;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::types::UserId;
use vault_entity::{AccessLevel, Grant, NewResourceKey, ResourceKind};

const GRANT_UNIQUE: &str = "resource_keys_grant_unique";
const SINGLE_OWNER: &str = "resource_keys_single_owner";

/// Queries over the `resource_keys` table.
#[derive(Debug, Clone, Copy)]
pub struct ResourceKeyRepository;

impl ResourceKeyRepository {
    /// Issue a grant. Fails with `KeyConflict` when one already exists for
    /// the (resource, user) pair.
    pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, key: &NewResourceKey) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO resource_keys \
             (resource_id, resource_kind, user_id, enc_key, nonce, access_level) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(key.resource_id)
        .bind(key.resource_kind)
        .bind(key.user_id)
        .bind(&key.enc_key)
        .bind(&key.nonce)
        .bind(key.access_level)
        .execute(executor)
        .await
        .map(|_| ())
        .map_err(|e| map_write_error(e, key, "Failed to insert resource key"))
    }

    /// Issue a grant, or replace the wrapped key and level of an existing one.
    pub async fn upsert<'e, E: PgExecutor<'e>>(executor: E, key: &NewResourceKey) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO resource_keys \
             (resource_id, resource_kind, user_id, enc_key, nonce, access_level) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT ON CONSTRAINT resource_keys_grant_unique DO UPDATE SET \
             enc_key = EXCLUDED.enc_key, nonce = EXCLUDED.nonce, \
             access_level = EXCLUDED.access_level, updated_at = NOW()",
        )
        .bind(key.resource_id)
        .bind(key.resource_kind)
        .bind(key.user_id)
        .bind(&key.enc_key)
        .bind(&key.nonce)
        .bind(key.access_level)
        .execute(executor)
        .await
        .map(|_| ())
        .map_err(|e| map_write_error(e, key, "Failed to upsert resource key"))
    }

    /// Change the level of an existing grant.
    pub async fn set_access_level<'e, E: PgExecutor<'e>>(
        executor: E,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<u64> {
        sqlx::query(
            "UPDATE resource_keys SET access_level = $4, updated_at = NOW() \
             WHERE resource_id = $1 AND resource_kind = $2 AND user_id = $3",
        )
        .bind(resource_id)
        .bind(kind)
        .bind(user_id)
        .bind(level)
        .execute(executor)
        .await
        .map(|r| r.rows_affected())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set access level", e))
    }

    /// Remove a grant.
    pub async fn delete<'e, E: PgExecutor<'e>>(
        executor: E,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64> {
        sqlx::query(
            "DELETE FROM resource_keys \
             WHERE resource_id = $1 AND resource_kind = $2 AND user_id = $3",
        )
        .bind(resource_id)
        .bind(kind)
        .bind(user_id)
        .execute(executor)
        .await
        .map(|r| r.rows_affected())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete resource key", e))
    }

    /// Every grant on a resource, oldest first.
    pub async fn list_for_resource<'e, E: PgExecutor<'e>>(
        executor: E,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> AppResult<Vec<Grant>> {
        sqlx::query_as::<_, Grant>(
            "SELECT user_id, access_level, created_at FROM resource_keys \
             WHERE resource_id = $1 AND resource_kind = $2 \
             ORDER BY created_at ASC, user_id ASC",
        )
        .bind(resource_id)
        .bind(kind)
        .fetch_all(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list grants", e))
    }
}

fn map_write_error(e: sqlx::Error, key: &NewResourceKey, context: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(GRANT_UNIQUE) => {
            AppError::key_conflict(format!(
                "A grant already exists for user {} on {} {}",
                key.user_id, key.resource_kind, key.resource_id
            ))
        }
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(SINGLE_OWNER) => {
            AppError::key_conflict(format!(
                "{} {} already has an owner",
                key.resource_kind, key.resource_id
            ))
        }
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}
