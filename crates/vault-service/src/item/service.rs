//! Item creation, listing, retrieval, and update.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::types::{FolderId, ItemId};
use vault_database::VaultStore;
use vault_entity::{
    AccessLevel, AccessibleItem, ItemPayload, ItemSummary, NewItem, NewResourceKey, ResourceKind,
};

use crate::access::AccessService;
use crate::context::RequestContext;
use crate::operations::{ResourceOperations, create_failed};
use crate::validation::require_blob;

/// Request to create an item.
#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    /// Containing folder; `None` or nil for unfiled.
    pub folder_id: Option<FolderId>,
    pub item_type: String,
    pub enc_data: Vec<u8>,
    pub data_nonce: Vec<u8>,
    pub enc_overview: Vec<u8>,
    pub overview_nonce: Vec<u8>,
    /// Item key wrapped for the creator.
    pub enc_key: Vec<u8>,
    pub key_nonce: Vec<u8>,
}

/// Request to replace an item's encrypted blobs.
#[derive(Debug, Clone)]
pub struct UpdateItemRequest {
    pub enc_data: Vec<u8>,
    pub data_nonce: Vec<u8>,
    pub enc_overview: Vec<u8>,
    pub overview_nonce: Vec<u8>,
}

/// Result of a successful creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedItem {
    pub id: ItemId,
}

/// Manages items.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn VaultStore>,
    access: Arc<AccessService>,
}

impl std::fmt::Debug for ItemService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemService").finish_non_exhaustive()
    }
}

impl ItemService {
    /// Creates a new item service.
    pub fn new(store: Arc<dyn VaultStore>, access: Arc<AccessService>) -> Self {
        Self { store, access }
    }

    /// Creates an item and the creator's OWNER grant in one unit.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateItemRequest,
    ) -> AppResult<CreatedItem> {
        if req.item_type.trim().is_empty() {
            return Err(AppError::validation("type is required"));
        }
        require_blob("enc_data", &req.enc_data)?;
        require_blob("data_nonce", &req.data_nonce)?;
        require_blob("enc_overview", &req.enc_overview)?;
        require_blob("overview_nonce", &req.overview_nonce)?;
        require_blob("enc_key", &req.enc_key)?;
        require_blob("key_nonce", &req.key_nonce)?;
        let folder_id = req.folder_id.filter(|f| !f.is_nil());

        let mut unit = self.store.begin().await?;

        if let Some(folder) = folder_id {
            match unit
                .find_access_level(ResourceKind::Folder, folder.0, ctx.user_id)
                .await?
            {
                None => return Err(AppError::not_found("Folder not found")),
                Some(level) if !level.can_write() => {
                    return Err(AppError::access_denied(
                        "Adding items to a folder requires WRITE access",
                    ));
                }
                Some(_) => {}
            }
        }

        let item = unit
            .insert_item(&NewItem {
                id: ItemId::generate(),
                owner_id: ctx.user_id,
                folder_id,
                item_type: req.item_type,
                payload: ItemPayload {
                    enc_data: req.enc_data,
                    data_nonce: req.data_nonce,
                    enc_overview: req.enc_overview,
                    overview_nonce: req.overview_nonce,
                },
            })
            .await
            .map_err(|e| create_failed(e, "item"))?;

        unit.insert_resource_key(&NewResourceKey {
            resource_id: item.id.0,
            resource_kind: ResourceKind::Item,
            user_id: ctx.user_id,
            enc_key: req.enc_key,
            nonce: req.key_nonce,
            access_level: AccessLevel::Owner,
        })
        .await
        .map_err(|e| create_failed(e, "item key"))?;

        unit.commit().await?;

        info!(
            user_id = %ctx.user_id,
            item_id = %item.id,
            folder_id = ?folder_id,
            item_type = %item.item_type,
            "Item created"
        );

        Ok(CreatedItem { id: item.id })
    }

    /// Lists items in a folder (unfiled when `None`) that the caller can read.
    /// Rows carry the overview blob only.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<ItemSummary>> {
        let folder_id = folder_id.filter(|f| !f.is_nil());
        self.store.list_items(ctx.user_id, folder_id).await
    }

    /// Gets an item with its full data.
    ///
    /// A missing item and one the caller holds no grant on are reported
    /// identically.
    pub async fn get(&self, ctx: &RequestContext, id: ItemId) -> AppResult<AccessibleItem> {
        self.store
            .get_item(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))
    }

    /// Replaces the encrypted blobs. The access check and the write share
    /// one unit, so a concurrent revoke cannot land between them.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ItemId,
        req: UpdateItemRequest,
    ) -> AppResult<()> {
        require_blob("enc_data", &req.enc_data)?;
        require_blob("data_nonce", &req.data_nonce)?;
        require_blob("enc_overview", &req.enc_overview)?;
        require_blob("overview_nonce", &req.overview_nonce)?;

        let mut unit = self.store.begin().await?;
        match unit
            .find_access_level(ResourceKind::Item, id.0, ctx.user_id)
            .await?
        {
            None => return Err(AppError::not_found("Item not found")),
            Some(level) if !level.can_write() => {
                return Err(AppError::access_denied(
                    "Updating an item requires WRITE or OWNER access",
                ));
            }
            Some(_) => {}
        }

        let payload = ItemPayload {
            enc_data: req.enc_data,
            data_nonce: req.data_nonce,
            enc_overview: req.enc_overview,
            overview_nonce: req.overview_nonce,
        };
        if unit.update_item(id, ctx.user_id, &payload).await? == 0 {
            return Err(AppError::not_found("Item not found"));
        }
        unit.commit().await?;

        info!(user_id = %ctx.user_id, item_id = %id, "Item updated");
        Ok(())
    }
}

#[async_trait]
impl ResourceOperations for ItemService {
    const KIND: ResourceKind = ResourceKind::Item;

    type Id = ItemId;
    type Create = CreateItemRequest;
    type Created = CreatedItem;
    type Update = UpdateItemRequest;
    type Filter = Option<FolderId>;
    type Summary = ItemSummary;

    fn access(&self) -> &AccessService {
        &self.access
    }

    async fn create(&self, ctx: &RequestContext, req: CreateItemRequest) -> AppResult<CreatedItem> {
        ItemService::create(self, ctx, req).await
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<ItemSummary>> {
        ItemService::list(self, ctx, folder_id).await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: ItemId,
        req: UpdateItemRequest,
    ) -> AppResult<()> {
        ItemService::update(self, ctx, id, req).await
    }
}
