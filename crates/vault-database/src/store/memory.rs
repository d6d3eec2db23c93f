//! In-process store for development and tests.
//!
//! State lives behind a single async mutex. An atomic unit holds the lock
//! for its whole lifetime and works on a private copy of the state, which
//! replaces the shared state only on commit; units therefore run serially
//! and a dropped unit leaves no trace.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::types::{FolderId, ItemId, UserId};
use vault_entity::{
    AccessLevel, AccessibleFolder, AccessibleItem, Folder, FolderPayload, Grant, Item,
    ItemPayload, ItemSummary, NewFolder, NewItem, NewResourceKey, ResourceKey, ResourceKind,
};

use super::{StoreUnit, VaultStore};

type GrantKey = (ResourceKind, Uuid, UserId);

#[derive(Debug, Default, Clone)]
struct MemoryState {
    folders: BTreeMap<FolderId, Folder>,
    items: BTreeMap<ItemId, Item>,
    keys: BTreeMap<GrantKey, ResourceKey>,
}

impl MemoryState {
    fn is_live(&self, kind: ResourceKind, id: Uuid) -> bool {
        match kind {
            ResourceKind::Folder => self.folders.get(&FolderId(id)).is_some_and(|f| !f.deleted),
            ResourceKind::Item => self.items.get(&ItemId(id)).is_some_and(|i| !i.deleted),
        }
    }

    fn access_level(&self, kind: ResourceKind, id: Uuid, user_id: UserId) -> Option<AccessLevel> {
        if !self.is_live(kind, id) {
            return None;
        }
        self.keys.get(&(kind, id, user_id)).map(|k| k.access_level)
    }

    fn accessible_folder(&self, folder: &Folder, user_id: UserId) -> Option<AccessibleFolder> {
        let key = self.keys.get(&(ResourceKind::Folder, folder.id.0, user_id))?;
        Some(AccessibleFolder {
            folder: folder.clone(),
            wrapped_key: key.enc_key.clone(),
            key_nonce: key.nonce.clone(),
            access_level: key.access_level,
        })
    }

    fn accessible_item(&self, item: &Item, user_id: UserId) -> Option<AccessibleItem> {
        let key = self.keys.get(&(ResourceKind::Item, item.id.0, user_id))?;
        Some(AccessibleItem {
            item: item.clone(),
            wrapped_key: key.enc_key.clone(),
            key_nonce: key.nonce.clone(),
            access_level: key.access_level,
        })
    }

    fn has_owner(&self, kind: ResourceKind, id: Uuid, except: UserId) -> bool {
        self.keys.iter().any(|((k, r, u), key)| {
            *k == kind && *r == id && *u != except && key.access_level == AccessLevel::Owner
        })
    }

    fn write_key(&mut self, key: &NewResourceKey, replace: bool) -> AppResult<()> {
        let grant_key = (key.resource_kind, key.resource_id, key.user_id);
        let existing = self.keys.get(&grant_key).cloned();
        if existing.is_some() && !replace {
            return Err(AppError::key_conflict(format!(
                "A grant already exists for user {} on {} {}",
                key.user_id, key.resource_kind, key.resource_id
            )));
        }
        if key.access_level == AccessLevel::Owner
            && self.has_owner(key.resource_kind, key.resource_id, key.user_id)
        {
            return Err(AppError::key_conflict(format!(
                "{} {} already has an owner",
                key.resource_kind, key.resource_id
            )));
        }
        let now = Utc::now();
        self.keys.insert(
            grant_key,
            ResourceKey {
                resource_id: key.resource_id,
                resource_kind: key.resource_kind,
                user_id: key.user_id,
                enc_key: key.enc_key.clone(),
                nonce: key.nonce.clone(),
                access_level: key.access_level,
                created_at: existing.map_or(now, |k| k.created_at),
                updated_at: now,
            },
        );
        Ok(())
    }

    fn grants(&self, kind: ResourceKind, id: Uuid) -> Vec<Grant> {
        let mut grants: Vec<Grant> = self
            .keys
            .values()
            .filter(|k| k.resource_kind == kind && k.resource_id == id)
            .map(Grant::from)
            .collect();
        grants.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        grants
    }
}

/// Store that keeps everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryVaultStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryVaultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw folder row, deleted or not. Bypasses every access check.
    pub async fn raw_folder(&self, id: FolderId) -> Option<Folder> {
        self.state.lock().await.folders.get(&id).cloned()
    }

    /// Raw item row, deleted or not. Bypasses every access check.
    pub async fn raw_item(&self, id: ItemId) -> Option<Item> {
        self.state.lock().await.items.get(&id).cloned()
    }

    /// Raw grant rows for a resource, whatever its state.
    pub async fn raw_grants(&self, kind: ResourceKind, id: Uuid) -> Vec<ResourceKey> {
        self.state
            .lock()
            .await
            .keys
            .values()
            .filter(|k| k.resource_kind == kind && k.resource_id == id)
            .cloned()
            .collect()
    }

    /// Number of folder and item rows, deleted included.
    pub async fn resource_count(&self) -> usize {
        let state = self.state.lock().await;
        state.folders.len() + state.items.len()
    }
}

#[async_trait]
impl VaultStore for MemoryVaultStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreUnit>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnit { guard, staged }))
    }

    async fn list_folders(&self, user_id: UserId) -> AppResult<Vec<AccessibleFolder>> {
        let state = self.state.lock().await;
        Ok(state
            .folders
            .values()
            .filter(|f| !f.deleted)
            .filter_map(|f| state.accessible_folder(f, user_id))
            .collect())
    }

    async fn list_items(
        &self,
        user_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<ItemSummary>> {
        let state = self.state.lock().await;
        Ok(state
            .items
            .values()
            .filter(|i| !i.deleted && i.folder_id == folder_id)
            .filter_map(|i| state.accessible_item(i, user_id))
            .map(ItemSummary::from)
            .collect())
    }

    async fn get_folder(
        &self,
        id: FolderId,
        user_id: UserId,
    ) -> AppResult<Option<AccessibleFolder>> {
        let state = self.state.lock().await;
        Ok(state
            .folders
            .get(&id)
            .filter(|f| !f.deleted)
            .and_then(|f| state.accessible_folder(f, user_id)))
    }

    async fn get_item(&self, id: ItemId, user_id: UserId) -> AppResult<Option<AccessibleItem>> {
        let state = self.state.lock().await;
        Ok(state
            .items
            .get(&id)
            .filter(|i| !i.deleted)
            .and_then(|i| state.accessible_item(i, user_id)))
    }

    async fn find_access_level(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<AccessLevel>> {
        Ok(self.state.lock().await.access_level(kind, resource_id, user_id))
    }

    async fn is_owner(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<bool> {
        let level = self.state.lock().await.access_level(kind, resource_id, user_id);
        Ok(level == Some(AccessLevel::Owner))
    }

    async fn soft_delete(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        if !state
            .access_level(kind, resource_id, user_id)
            .is_some_and(|l| l.can_delete())
        {
            return Ok(0);
        }
        let now = Utc::now();
        match kind {
            ResourceKind::Folder => {
                if let Some(folder) = state.folders.get_mut(&FolderId(resource_id)) {
                    folder.deleted = true;
                    folder.updated_at = now;
                }
            }
            ResourceKind::Item => {
                if let Some(item) = state.items.get_mut(&ItemId(resource_id)) {
                    item.deleted = true;
                    item.updated_at = now;
                }
            }
        }
        Ok(1)
    }

    async fn list_grants(&self, kind: ResourceKind, resource_id: Uuid) -> AppResult<Vec<Grant>> {
        Ok(self.state.lock().await.grants(kind, resource_id))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Atomic unit over the memory store.
pub struct MemoryUnit {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl StoreUnit for MemoryUnit {
    async fn insert_folder(&mut self, data: &NewFolder) -> AppResult<Folder> {
        if self.staged.folders.contains_key(&data.id) {
            return Err(AppError::database(format!("Folder {} already exists", data.id)));
        }
        let now = Utc::now();
        let folder = Folder {
            id: data.id,
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            enc_name: data.payload.enc_name.clone(),
            nonce: data.payload.nonce.clone(),
            deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.staged.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn insert_item(&mut self, data: &NewItem) -> AppResult<Item> {
        if self.staged.items.contains_key(&data.id) {
            return Err(AppError::database(format!("Item {} already exists", data.id)));
        }
        let now = Utc::now();
        let item = Item {
            id: data.id,
            owner_id: data.owner_id,
            folder_id: data.folder_id,
            item_type: data.item_type.clone(),
            enc_data: data.payload.enc_data.clone(),
            data_nonce: data.payload.data_nonce.clone(),
            enc_overview: data.payload.enc_overview.clone(),
            overview_nonce: data.payload.overview_nonce.clone(),
            deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.staged.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn insert_resource_key(&mut self, key: &NewResourceKey) -> AppResult<()> {
        self.staged.write_key(key, false)
    }

    async fn upsert_resource_key(&mut self, key: &NewResourceKey) -> AppResult<()> {
        self.staged.write_key(key, true)
    }

    async fn find_access_level(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<AccessLevel>> {
        Ok(self.staged.access_level(kind, resource_id, user_id))
    }

    async fn update_folder(
        &mut self,
        id: FolderId,
        user_id: UserId,
        payload: &FolderPayload,
    ) -> AppResult<u64> {
        let can_write = self
            .staged
            .access_level(ResourceKind::Folder, id.0, user_id)
            .is_some_and(|l| l.can_write());
        match self.staged.folders.get_mut(&id) {
            Some(folder) if can_write => {
                folder.enc_name = payload.enc_name.clone();
                folder.nonce = payload.nonce.clone();
                folder.updated_at = Utc::now();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn update_item(
        &mut self,
        id: ItemId,
        user_id: UserId,
        payload: &ItemPayload,
    ) -> AppResult<u64> {
        let can_write = self
            .staged
            .access_level(ResourceKind::Item, id.0, user_id)
            .is_some_and(|l| l.can_write());
        match self.staged.items.get_mut(&id) {
            Some(item) if can_write => {
                item.enc_data = payload.enc_data.clone();
                item.data_nonce = payload.data_nonce.clone();
                item.enc_overview = payload.enc_overview.clone();
                item.overview_nonce = payload.overview_nonce.clone();
                item.updated_at = Utc::now();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn set_access_level(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<u64> {
        if level == AccessLevel::Owner && self.staged.has_owner(kind, resource_id, user_id) {
            return Err(AppError::key_conflict(format!(
                "{kind} {resource_id} already has an owner"
            )));
        }
        match self.staged.keys.get_mut(&(kind, resource_id, user_id)) {
            Some(key) => {
                key.access_level = level;
                key.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn set_owner(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        owner_id: UserId,
    ) -> AppResult<u64> {
        let updated = match kind {
            ResourceKind::Folder => self
                .staged
                .folders
                .get_mut(&FolderId(resource_id))
                .filter(|f| !f.deleted)
                .map(|f| f.owner_id = owner_id),
            ResourceKind::Item => self
                .staged
                .items
                .get_mut(&ItemId(resource_id))
                .filter(|i| !i.deleted)
                .map(|i| i.owner_id = owner_id),
        };
        Ok(u64::from(updated.is_some()))
    }

    async fn delete_resource_key(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64> {
        Ok(u64::from(
            self.staged.keys.remove(&(kind, resource_id, user_id)).is_some(),
        ))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnit { mut guard, staged } = *self;
        *guard = staged;
        debug!("Memory unit committed");
        Ok(())
    }
}
