//! Queries that apply to either resource kind.

use sqlx::PgExecutor;
use uuid::Uuid;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::types::UserId;
use vault_entity::{AccessLevel, ResourceKind};

use super::table_for;

/// Kind-polymorphic access and lifecycle queries.
#[derive(Debug, Clone, Copy)]
pub struct ResourceRepository;

impl ResourceRepository {
    /// The user's access level on a non-deleted resource.
    ///
    /// With `lock` set the grant row is held `FOR SHARE` until the enclosing
    /// transaction ends, so a concurrent revoke cannot slip between a check
    /// and the write that depends on it.
    pub async fn find_access_level<'e, E: PgExecutor<'e>>(
        executor: E,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
        lock: bool,
    ) -> AppResult<Option<AccessLevel>> {
        let table = table_for(kind);
        let lock_clause = if lock { " FOR SHARE OF k" } else { "" };
        let sql = format!(
            "SELECT k.access_level FROM resource_keys k \
             JOIN {table} r ON r.id = k.resource_id \
             WHERE k.resource_id = $1 AND k.resource_kind = $2 AND k.user_id = $3 \
             AND r.deleted = FALSE{lock_clause}"
        );
        sqlx::query_scalar::<_, AccessLevel>(&sql)
            .bind(resource_id)
            .bind(kind)
            .bind(user_id)
            .fetch_optional(executor)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find access level", e)
            })
    }

    /// Whether the user holds the OWNER grant on a non-deleted resource.
    pub async fn is_owner<'e, E: PgExecutor<'e>>(
        executor: E,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<bool> {
        let table = table_for(kind);
        let sql = format!(
            "SELECT EXISTS ( \
                 SELECT 1 FROM resource_keys k JOIN {table} r ON r.id = k.resource_id \
                 WHERE k.resource_id = $1 AND k.resource_kind = $2 AND k.user_id = $3 \
                 AND k.access_level = 'OWNER' AND r.deleted = FALSE)"
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(resource_id)
            .bind(kind)
            .bind(user_id)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check ownership", e))
    }

    /// Flag a resource deleted when `user_id` holds its OWNER grant.
    pub async fn soft_delete<'e, E: PgExecutor<'e>>(
        executor: E,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64> {
        let table = table_for(kind);
        let sql = format!(
            "UPDATE {table} r SET deleted = TRUE, updated_at = NOW() \
             WHERE r.id = $1 AND r.deleted = FALSE AND EXISTS ( \
                 SELECT 1 FROM resource_keys k \
                 WHERE k.resource_id = r.id AND k.resource_kind = $2 \
                 AND k.user_id = $3 AND k.access_level = 'OWNER')"
        );
        sqlx::query(&sql)
            .bind(resource_id)
            .bind(kind)
            .bind(user_id)
            .execute(executor)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete resource", e))
    }

    /// Record a new owner on the resource row.
    pub async fn set_owner<'e, E: PgExecutor<'e>>(
        executor: E,
        kind: ResourceKind,
        resource_id: Uuid,
        owner_id: UserId,
    ) -> AppResult<u64> {
        let table = table_for(kind);
        let sql = format!("UPDATE {table} SET owner_id = $2 WHERE id = $1 AND deleted = FALSE");
        sqlx::query(&sql)
            .bind(resource_id)
            .bind(owner_id)
            .execute(executor)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set owner", e))
    }
}
