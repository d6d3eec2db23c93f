//! Folder creation, listing, lookup, and renaming.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::types::FolderId;
use vault_database::VaultStore;
use vault_entity::{
    AccessLevel, AccessibleFolder, FolderPayload, NewFolder, NewResourceKey, ResourceKind,
};

use crate::access::AccessService;
use crate::context::RequestContext;
use crate::operations::{ResourceOperations, create_failed};
use crate::validation::require_blob;

/// Request to create a folder.
#[derive(Debug, Clone)]
pub struct CreateFolderRequest {
    /// Containing folder; `None` or nil for root level.
    pub parent_id: Option<FolderId>,
    pub enc_name: Vec<u8>,
    pub name_nonce: Vec<u8>,
    /// Folder key wrapped for the creator.
    pub enc_key: Vec<u8>,
    pub key_nonce: Vec<u8>,
}

/// Request to replace a folder's encrypted name.
#[derive(Debug, Clone)]
pub struct UpdateFolderRequest {
    pub enc_name: Vec<u8>,
    pub name_nonce: Vec<u8>,
}

/// Result of a successful creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFolder {
    pub id: FolderId,
    pub parent_id: Option<FolderId>,
}

/// Manages folders.
#[derive(Clone)]
pub struct FolderService {
    store: Arc<dyn VaultStore>,
    access: Arc<AccessService>,
}

impl std::fmt::Debug for FolderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderService").finish_non_exhaustive()
    }
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: Arc<dyn VaultStore>, access: Arc<AccessService>) -> Self {
        Self { store, access }
    }

    /// Creates a folder and the creator's OWNER grant in one unit.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<CreatedFolder> {
        require_blob("enc_name", &req.enc_name)?;
        require_blob("name_nonce", &req.name_nonce)?;
        require_blob("enc_key", &req.enc_key)?;
        require_blob("key_nonce", &req.key_nonce)?;
        let parent_id = req.parent_id.filter(|p| !p.is_nil());

        let mut unit = self.store.begin().await?;

        if let Some(parent) = parent_id {
            match unit
                .find_access_level(ResourceKind::Folder, parent.0, ctx.user_id)
                .await?
            {
                None => return Err(AppError::not_found("Parent folder not found")),
                Some(level) if !level.can_write() => {
                    return Err(AppError::access_denied(
                        "Creating inside a folder requires WRITE access",
                    ));
                }
                Some(_) => {}
            }
        }

        let folder = unit
            .insert_folder(&NewFolder {
                id: FolderId::generate(),
                owner_id: ctx.user_id,
                parent_id,
                payload: FolderPayload {
                    enc_name: req.enc_name,
                    nonce: req.name_nonce,
                },
            })
            .await
            .map_err(|e| create_failed(e, "folder"))?;

        unit.insert_resource_key(&NewResourceKey {
            resource_id: folder.id.0,
            resource_kind: ResourceKind::Folder,
            user_id: ctx.user_id,
            enc_key: req.enc_key,
            nonce: req.key_nonce,
            access_level: AccessLevel::Owner,
        })
        .await
        .map_err(|e| create_failed(e, "folder key"))?;

        unit.commit().await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent_id = ?parent_id,
            "Folder created"
        );

        Ok(CreatedFolder {
            id: folder.id,
            parent_id,
        })
    }

    /// Lists every folder the caller can read, each with the caller's key.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<AccessibleFolder>> {
        self.store.list_folders(ctx.user_id).await
    }

    /// Gets a folder the caller holds a grant on.
    pub async fn get(&self, ctx: &RequestContext, id: FolderId) -> AppResult<AccessibleFolder> {
        self.store
            .get_folder(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    /// Replaces the encrypted name. Requires WRITE.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<()> {
        require_blob("enc_name", &req.enc_name)?;
        require_blob("name_nonce", &req.name_nonce)?;

        let mut unit = self.store.begin().await?;
        match unit
            .find_access_level(ResourceKind::Folder, id.0, ctx.user_id)
            .await?
        {
            None => return Err(AppError::not_found_or_denied("Folder not found")),
            Some(level) if !level.can_write() => {
                return Err(AppError::access_denied(
                    "Updating a folder requires WRITE access",
                ));
            }
            Some(_) => {}
        }

        let payload = FolderPayload {
            enc_name: req.enc_name,
            nonce: req.name_nonce,
        };
        if unit.update_folder(id, ctx.user_id, &payload).await? == 0 {
            return Err(AppError::not_found_or_denied("Folder not found"));
        }
        unit.commit().await?;

        info!(user_id = %ctx.user_id, folder_id = %id, "Folder updated");
        Ok(())
    }
}

#[async_trait]
impl ResourceOperations for FolderService {
    const KIND: ResourceKind = ResourceKind::Folder;

    type Id = FolderId;
    type Create = CreateFolderRequest;
    type Created = CreatedFolder;
    type Update = UpdateFolderRequest;
    type Filter = ();
    type Summary = AccessibleFolder;

    fn access(&self) -> &AccessService {
        &self.access
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<CreatedFolder> {
        FolderService::create(self, ctx, req).await
    }

    async fn list(&self, ctx: &RequestContext, _filter: ()) -> AppResult<Vec<AccessibleFolder>> {
        FolderService::list(self, ctx).await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<()> {
        FolderService::update(self, ctx, id, req).await
    }
}
