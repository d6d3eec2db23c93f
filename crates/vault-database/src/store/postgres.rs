//! PostgreSQL-backed store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::types::{FolderId, ItemId, UserId};
use vault_entity::{
    AccessLevel, AccessibleFolder, AccessibleItem, Folder, FolderPayload, Grant, Item,
    ItemPayload, ItemSummary, NewFolder, NewItem, NewResourceKey, ResourceKind,
};

use super::{StoreUnit, VaultStore};
use crate::connection::DatabasePool;
use crate::repositories::{
    FolderRepository, ItemRepository, ResourceKeyRepository, ResourceRepository,
};

/// Store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgVaultStore {
    pool: PgPool,
}

impl PgVaultStore {
    /// Create a store over an established pool.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl VaultStore for PgVaultStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreUnit>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::TransactionFailure, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgUnit { tx }))
    }

    async fn list_folders(&self, user_id: UserId) -> AppResult<Vec<AccessibleFolder>> {
        FolderRepository::list_for_user(&self.pool, user_id).await
    }

    async fn list_items(
        &self,
        user_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<ItemSummary>> {
        ItemRepository::list_for_user(&self.pool, user_id, folder_id).await
    }

    async fn get_folder(
        &self,
        id: FolderId,
        user_id: UserId,
    ) -> AppResult<Option<AccessibleFolder>> {
        FolderRepository::find_with_access(&self.pool, id, user_id).await
    }

    async fn get_item(&self, id: ItemId, user_id: UserId) -> AppResult<Option<AccessibleItem>> {
        ItemRepository::find_with_access(&self.pool, id, user_id).await
    }

    async fn find_access_level(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<AccessLevel>> {
        ResourceRepository::find_access_level(&self.pool, kind, resource_id, user_id, false).await
    }

    async fn is_owner(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<bool> {
        ResourceRepository::is_owner(&self.pool, kind, resource_id, user_id).await
    }

    async fn soft_delete(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64> {
        ResourceRepository::soft_delete(&self.pool, kind, resource_id, user_id).await
    }

    async fn list_grants(&self, kind: ResourceKind, resource_id: Uuid) -> AppResult<Vec<Grant>> {
        ResourceKeyRepository::list_for_resource(&self.pool, kind, resource_id).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

/// An open PostgreSQL transaction.
///
/// `sqlx` rolls the transaction back when it is dropped uncommitted.
pub struct PgUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreUnit for PgUnit {
    async fn insert_folder(&mut self, data: &NewFolder) -> AppResult<Folder> {
        FolderRepository::insert(&mut *self.tx, data).await
    }

    async fn insert_item(&mut self, data: &NewItem) -> AppResult<Item> {
        ItemRepository::insert(&mut *self.tx, data).await
    }

    async fn insert_resource_key(&mut self, key: &NewResourceKey) -> AppResult<()> {
        ResourceKeyRepository::insert(&mut *self.tx, key).await
    }

    async fn upsert_resource_key(&mut self, key: &NewResourceKey) -> AppResult<()> {
        ResourceKeyRepository::upsert(&mut *self.tx, key).await
    }

    async fn find_access_level(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<AccessLevel>> {
        ResourceRepository::find_access_level(&mut *self.tx, kind, resource_id, user_id, true)
            .await
    }

    async fn update_folder(
        &mut self,
        id: FolderId,
        user_id: UserId,
        payload: &FolderPayload,
    ) -> AppResult<u64> {
        FolderRepository::update_payload(&mut *self.tx, id, user_id, payload).await
    }

    async fn update_item(
        &mut self,
        id: ItemId,
        user_id: UserId,
        payload: &ItemPayload,
    ) -> AppResult<u64> {
        ItemRepository::update_payload(&mut *self.tx, id, user_id, payload).await
    }

    async fn set_access_level(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<u64> {
        ResourceKeyRepository::set_access_level(&mut *self.tx, kind, resource_id, user_id, level)
            .await
    }

    async fn set_owner(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        owner_id: UserId,
    ) -> AppResult<u64> {
        ResourceRepository::set_owner(&mut *self.tx, kind, resource_id, owner_id).await
    }

    async fn delete_resource_key(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64> {
        ResourceKeyRepository::delete(&mut *self.tx, kind, resource_id, user_id).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::TransactionFailure, "Failed to commit transaction", e)
        })?;
        debug!("Transaction committed");
        Ok(())
    }
}
