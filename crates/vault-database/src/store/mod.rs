//! The resource store contract.
//!
//! [`VaultStore`] answers standalone reads and single-statement mutations.
//! Anything that must change several rows consistently goes through a
//! [`StoreUnit`] obtained from [`VaultStore::begin`]: the unit's writes are
//! invisible to other callers until [`StoreUnit::commit`], and a unit that is
//! dropped without committing (error, cancellation, panic) is rolled back.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use vault_core::result::AppResult;
use vault_core::types::{FolderId, ItemId, UserId};
use vault_entity::{
    AccessLevel, AccessibleFolder, AccessibleItem, Folder, FolderPayload, Grant, Item,
    ItemPayload, ItemSummary, NewFolder, NewItem, NewResourceKey, ResourceKind,
};

/// Durable home of folders, items, and their grants.
///
/// Every method that can be scoped to the caller takes the caller's id and
/// applies it in the predicate; a resource id alone is never trusted.
#[async_trait]
pub trait VaultStore: Send + Sync + 'static {
    /// Open an atomic unit.
    async fn begin(&self) -> AppResult<Box<dyn StoreUnit>>;

    /// Non-deleted folders the user holds any grant on, ordered by id.
    async fn list_folders(&self, user_id: UserId) -> AppResult<Vec<AccessibleFolder>>;

    /// Non-deleted items in `folder_id` (unfiled when `None`) the user holds
    /// any grant on, ordered by id.
    async fn list_items(
        &self,
        user_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<ItemSummary>>;

    /// A folder plus the user's grant; `None` when missing, deleted, or not
    /// granted.
    async fn get_folder(&self, id: FolderId, user_id: UserId)
    -> AppResult<Option<AccessibleFolder>>;

    /// An item plus the user's grant; `None` when missing, deleted, or not
    /// granted.
    async fn get_item(&self, id: ItemId, user_id: UserId) -> AppResult<Option<AccessibleItem>>;

    /// The user's level on a non-deleted resource.
    async fn find_access_level(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<AccessLevel>>;

    /// Whether the user holds the OWNER grant on a non-deleted resource.
    async fn is_owner(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<bool>;

    /// Flag the resource deleted if the caller owns it. Returns rows affected.
    async fn soft_delete(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64>;

    /// All grants on a resource, without key material.
    async fn list_grants(&self, kind: ResourceKind, resource_id: Uuid) -> AppResult<Vec<Grant>>;

    /// Verify the store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// An open atomic unit against the store.
#[async_trait]
pub trait StoreUnit: Send {
    /// Insert a folder row.
    async fn insert_folder(&mut self, data: &NewFolder) -> AppResult<Folder>;

    /// Insert an item row.
    async fn insert_item(&mut self, data: &NewItem) -> AppResult<Item>;

    /// Issue a grant; `KeyConflict` if the pair already has one.
    async fn insert_resource_key(&mut self, key: &NewResourceKey) -> AppResult<()>;

    /// Issue a grant or replace the existing one's key and level.
    async fn upsert_resource_key(&mut self, key: &NewResourceKey) -> AppResult<()>;

    /// The user's level on a non-deleted resource, read under the unit's
    /// isolation.
    async fn find_access_level(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<AccessLevel>>;

    /// Replace a folder's payload if the caller holds WRITE or OWNER.
    async fn update_folder(
        &mut self,
        id: FolderId,
        user_id: UserId,
        payload: &FolderPayload,
    ) -> AppResult<u64>;

    /// Replace an item's payload if the caller holds WRITE or OWNER.
    async fn update_item(
        &mut self,
        id: ItemId,
        user_id: UserId,
        payload: &ItemPayload,
    ) -> AppResult<u64>;

    /// Change the level of an existing grant.
    async fn set_access_level(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<u64>;

    /// Record a new owner on the resource row.
    async fn set_owner(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        owner_id: UserId,
    ) -> AppResult<u64>;

    /// Remove a grant.
    async fn delete_resource_key(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64>;

    /// Publish every write made through this unit.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
