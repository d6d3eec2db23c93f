//! Shared fixtures for service tests.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use vault_core::config::{GrantConflictPolicy, SharingConfig};
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::types::{FolderId, ItemId, UserId};
use vault_database::{MemoryVaultStore, StoreUnit, VaultStore};
use vault_entity::{
    AccessLevel, AccessibleFolder, AccessibleItem, Folder, FolderPayload, Grant, Item,
    ItemPayload, ItemSummary, NewFolder, NewItem, NewResourceKey, ResourceKind,
};

use crate::access::AccessService;
use crate::context::RequestContext;
use crate::folder::{CreateFolderRequest, FolderService};
use crate::item::{CreateItemRequest, ItemService, UpdateItemRequest};
use crate::operations::{ResourceOperations, WrappedKey};

pub(crate) struct Fixture {
    pub raw: MemoryVaultStore,
    pub access: Arc<AccessService>,
    pub folders: FolderService,
    pub items: ItemService,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_policy(GrantConflictPolicy::Upsert)
    }

    pub fn with_policy(policy: GrantConflictPolicy) -> Self {
        let raw = MemoryVaultStore::new();
        Self::over(raw.clone(), Arc::new(raw), policy)
    }

    /// Services over an arbitrary store; `raw` must see the same state.
    pub fn over(
        raw: MemoryVaultStore,
        store: Arc<dyn VaultStore>,
        policy: GrantConflictPolicy,
    ) -> Self {
        let sharing = SharingConfig {
            on_existing_grant: policy,
        };
        let access = Arc::new(AccessService::new(store.clone(), &sharing));
        Self {
            raw,
            folders: FolderService::new(store.clone(), access.clone()),
            items: ItemService::new(store, access.clone()),
            access,
        }
    }

    pub fn user(&self) -> RequestContext {
        RequestContext::new(UserId::generate())
    }

    pub async fn folder(&self, ctx: &RequestContext, parent: Option<FolderId>) -> FolderId {
        self.folders
            .create(ctx, folder_request(parent))
            .await
            .expect("create folder")
            .id
    }

    pub async fn item(&self, ctx: &RequestContext, folder: Option<FolderId>) -> ItemId {
        self.items
            .create(ctx, item_request(folder))
            .await
            .expect("create item")
            .id
    }

    pub async fn share_folder(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        target: &RequestContext,
        level: AccessLevel,
    ) -> AppResult<()> {
        self.folders
            .share(ctx, id, target.user_id, wrapped(level))
            .await
    }

    pub async fn share_item(
        &self,
        ctx: &RequestContext,
        id: ItemId,
        target: &RequestContext,
        level: AccessLevel,
    ) -> AppResult<()> {
        self.items.share(ctx, id, target.user_id, wrapped(level)).await
    }
}

pub(crate) fn folder_request(parent: Option<FolderId>) -> CreateFolderRequest {
    CreateFolderRequest {
        parent_id: parent,
        enc_name: b"X".to_vec(),
        name_nonce: b"n1".to_vec(),
        enc_key: b"k1".to_vec(),
        key_nonce: b"n2".to_vec(),
    }
}

pub(crate) fn item_request(folder: Option<FolderId>) -> CreateItemRequest {
    CreateItemRequest {
        folder_id: folder,
        item_type: "login".to_string(),
        enc_data: b"data".to_vec(),
        data_nonce: b"dn".to_vec(),
        enc_overview: b"overview".to_vec(),
        overview_nonce: b"on".to_vec(),
        enc_key: b"ik".to_vec(),
        key_nonce: b"kn".to_vec(),
    }
}

pub(crate) fn item_update(data: &[u8]) -> UpdateItemRequest {
    UpdateItemRequest {
        enc_data: data.to_vec(),
        data_nonce: b"dn2".to_vec(),
        enc_overview: b"ov2".to_vec(),
        overview_nonce: b"on2".to_vec(),
    }
}

pub(crate) fn wrapped(level: AccessLevel) -> WrappedKey {
    WrappedKey {
        enc_key: format!("key-for-{level}").into_bytes(),
        key_nonce: b"wn".to_vec(),
        access_level: level,
    }
}

pub(crate) fn read_key() -> WrappedKey {
    wrapped(AccessLevel::Read)
}

/// How [`FaultyStore`] sabotages grant inserts.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Fault {
    /// Fail the insert with a database error.
    Fail,
    /// Never complete the insert.
    Hang,
}

/// Memory store whose units misbehave when inserting grants.
pub(crate) struct FaultyStore {
    inner: MemoryVaultStore,
    fault: Fault,
}

impl FaultyStore {
    pub fn new(inner: MemoryVaultStore, fault: Fault) -> Self {
        Self { inner, fault }
    }
}

#[async_trait]
impl VaultStore for FaultyStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreUnit>> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(FaultyUnit {
            inner,
            fault: self.fault,
        }))
    }

    async fn list_folders(&self, user_id: UserId) -> AppResult<Vec<AccessibleFolder>> {
        self.inner.list_folders(user_id).await
    }

    async fn list_items(
        &self,
        user_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<ItemSummary>> {
        self.inner.list_items(user_id, folder_id).await
    }

    async fn get_folder(
        &self,
        id: FolderId,
        user_id: UserId,
    ) -> AppResult<Option<AccessibleFolder>> {
        self.inner.get_folder(id, user_id).await
    }

    async fn get_item(&self, id: ItemId, user_id: UserId) -> AppResult<Option<AccessibleItem>> {
        self.inner.get_item(id, user_id).await
    }

    async fn find_access_level(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<AccessLevel>> {
        self.inner.find_access_level(kind, resource_id, user_id).await
    }

    async fn is_owner(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<bool> {
        self.inner.is_owner(kind, resource_id, user_id).await
    }

    async fn soft_delete(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64> {
        self.inner.soft_delete(kind, resource_id, user_id).await
    }

    async fn list_grants(&self, kind: ResourceKind, resource_id: Uuid) -> AppResult<Vec<Grant>> {
        self.inner.list_grants(kind, resource_id).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.inner.ping().await
    }
}

struct FaultyUnit {
    inner: Box<dyn StoreUnit>,
    fault: Fault,
}

async fn sabotage(fault: Fault) -> AppResult<()> {
    match fault {
        Fault::Fail => Err(AppError::database("injected fault: connection reset")),
        Fault::Hang => std::future::pending().await,
    }
}

#[async_trait]
impl StoreUnit for FaultyUnit {
    async fn insert_folder(&mut self, data: &NewFolder) -> AppResult<Folder> {
        self.inner.insert_folder(data).await
    }

    async fn insert_item(&mut self, data: &NewItem) -> AppResult<Item> {
        self.inner.insert_item(data).await
    }

    async fn insert_resource_key(&mut self, _key: &NewResourceKey) -> AppResult<()> {
        sabotage(self.fault).await
    }

    async fn upsert_resource_key(&mut self, _key: &NewResourceKey) -> AppResult<()> {
        sabotage(self.fault).await
    }

    async fn find_access_level(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<Option<AccessLevel>> {
        self.inner.find_access_level(kind, resource_id, user_id).await
    }

    async fn update_folder(
        &mut self,
        id: FolderId,
        user_id: UserId,
        payload: &FolderPayload,
    ) -> AppResult<u64> {
        self.inner.update_folder(id, user_id, payload).await
    }

    async fn update_item(
        &mut self,
        id: ItemId,
        user_id: UserId,
        payload: &ItemPayload,
    ) -> AppResult<u64> {
        self.inner.update_item(id, user_id, payload).await
    }

    async fn set_access_level(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<u64> {
        self.inner
            .set_access_level(kind, resource_id, user_id, level)
            .await
    }

    async fn set_owner(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        owner_id: UserId,
    ) -> AppResult<u64> {
        self.inner.set_owner(kind, resource_id, owner_id).await
    }

    async fn delete_resource_key(
        &mut self,
        kind: ResourceKind,
        resource_id: Uuid,
        user_id: UserId,
    ) -> AppResult<u64> {
        self.inner
            .delete_resource_key(kind, resource_id, user_id)
            .await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.inner.commit().await
    }
}
