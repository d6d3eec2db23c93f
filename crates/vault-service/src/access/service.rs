//! Sharing, revocation, and deletion of resources.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use vault_core::config::{GrantConflictPolicy, SharingConfig};
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::types::UserId;
use vault_database::{StoreUnit, VaultStore};
use vault_entity::{AccessLevel, Grant, NewResourceKey, ResourceKind};

use crate::context::RequestContext;
use crate::validation::require_blob;

/// Grant `target_user_id` access to a resource.
#[derive(Debug, Clone)]
pub struct ShareRequest {
    pub target_user_id: UserId,
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    /// Resource key re-wrapped by the owner's client for the target.
    pub enc_key: Vec<u8>,
    pub key_nonce: Vec<u8>,
    pub access_level: AccessLevel,
}

/// Remove `target_user_id`'s grant. Without a kind, folders are checked
/// before items.
#[derive(Debug, Clone)]
pub struct RevokeRequest {
    pub target_user_id: UserId,
    pub resource_id: Uuid,
    pub resource_kind: Option<ResourceKind>,
}

/// Issues, replaces, and removes grants, and soft-deletes resources.
#[derive(Clone)]
pub struct AccessService {
    store: Arc<dyn VaultStore>,
    policy: GrantConflictPolicy,
}

impl std::fmt::Debug for AccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessService")
            .field("policy", &self.policy)
            .finish()
    }
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(store: Arc<dyn VaultStore>, sharing: &SharingConfig) -> Self {
        Self {
            store,
            policy: sharing.on_existing_grant,
        }
    }

    /// Soft-delete a resource the caller owns.
    ///
    /// Missing, already deleted, and not owned all yield `NotFoundOrDenied`.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> AppResult<()> {
        let rows = self
            .store
            .soft_delete(kind, resource_id, ctx.user_id)
            .await?;
        if rows == 0 {
            return Err(AppError::not_found_or_denied(format!(
                "{kind} not found or not owned by caller"
            )));
        }

        info!(
            user_id = %ctx.user_id,
            kind = %kind,
            resource_id = %resource_id,
            "Resource deleted"
        );
        Ok(())
    }

    /// Grant a user access with a key wrapped for them.
    ///
    /// Only the OWNER may share. Sharing at OWNER hands ownership over: the
    /// caller keeps a WRITE grant and the target becomes the single owner.
    pub async fn share(&self, ctx: &RequestContext, req: ShareRequest) -> AppResult<()> {
        require_blob("enc_key", &req.enc_key)?;
        require_blob("key_nonce", &req.key_nonce)?;

        let kind = req.resource_kind;
        let mut unit = self.store.begin().await?;
        require_owner(unit.as_mut(), kind, req.resource_id, ctx.user_id, "share").await?;
        if req.target_user_id == ctx.user_id {
            return Err(AppError::validation("Cannot share a resource with yourself"));
        }

        let existing = unit
            .find_access_level(kind, req.resource_id, req.target_user_id)
            .await?;
        if existing.is_some() && self.policy == GrantConflictPolicy::Reject {
            return Err(AppError::key_conflict(format!(
                "User {} already has access to this {kind}",
                req.target_user_id
            )));
        }

        let key = NewResourceKey {
            resource_id: req.resource_id,
            resource_kind: kind,
            user_id: req.target_user_id,
            enc_key: req.enc_key,
            nonce: req.key_nonce,
            access_level: req.access_level,
        };

        if req.access_level == AccessLevel::Owner {
            // Demote first so the resource never carries two OWNER grants.
            unit.set_access_level(kind, req.resource_id, ctx.user_id, AccessLevel::Write)
                .await?;
            unit.upsert_resource_key(&key).await?;
            unit.set_owner(kind, req.resource_id, req.target_user_id)
                .await?;
        } else {
            match self.policy {
                GrantConflictPolicy::Upsert => unit.upsert_resource_key(&key).await?,
                GrantConflictPolicy::Reject => unit.insert_resource_key(&key).await?,
            }
        }

        unit.commit().await?;

        info!(
            user_id = %ctx.user_id,
            target_user_id = %req.target_user_id,
            kind = %kind,
            resource_id = %req.resource_id,
            access_level = %req.access_level,
            replaced = existing.is_some(),
            "Resource shared"
        );
        Ok(())
    }

    /// Remove another user's grant.
    ///
    /// The OWNER grant itself can never be revoked; ownership moves only by
    /// sharing at OWNER.
    pub async fn revoke(&self, ctx: &RequestContext, req: RevokeRequest) -> AppResult<()> {
        let kind = match req.resource_kind {
            Some(kind) => kind,
            None => self.resolve_owned_kind(ctx.user_id, req.resource_id).await?,
        };

        let mut unit = self.store.begin().await?;
        require_owner(unit.as_mut(), kind, req.resource_id, ctx.user_id, "revoke").await?;

        match unit
            .find_access_level(kind, req.resource_id, req.target_user_id)
            .await?
        {
            None => {
                return Err(AppError::not_found_or_denied(format!(
                    "User {} holds no grant on this {kind}",
                    req.target_user_id
                )));
            }
            Some(AccessLevel::Owner) => {
                return Err(AppError::access_denied("The owner grant cannot be revoked"));
            }
            Some(_) => {}
        }

        let rows = unit
            .delete_resource_key(kind, req.resource_id, req.target_user_id)
            .await?;
        if rows == 0 {
            return Err(AppError::not_found_or_denied("Grant already removed"));
        }
        unit.commit().await?;

        info!(
            user_id = %ctx.user_id,
            target_user_id = %req.target_user_id,
            kind = %kind,
            resource_id = %req.resource_id,
            "Access revoked"
        );
        Ok(())
    }

    /// Every grant on a resource the caller owns, without key material.
    pub async fn list_grants(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> AppResult<Vec<Grant>> {
        if !self.store.is_owner(kind, resource_id, ctx.user_id).await? {
            return Err(AppError::access_denied(format!(
                "Only the owner may list grants on this {kind}"
            )));
        }
        self.store.list_grants(kind, resource_id).await
    }

    /// Resolve which kind of resource the caller owns under this id,
    /// checking folders before items.
    async fn resolve_owned_kind(
        &self,
        user_id: UserId,
        resource_id: Uuid,
    ) -> AppResult<ResourceKind> {
        for kind in [ResourceKind::Folder, ResourceKind::Item] {
            if self.store.is_owner(kind, resource_id, user_id).await? {
                debug!(kind = %kind, resource_id = %resource_id, "Resolved kind by ownership");
                return Ok(kind);
            }
        }
        Err(AppError::access_denied(
            "Only the owner may change access to this resource",
        ))
    }
}

/// Fail with `AccessDenied` unless `user_id` holds the OWNER grant.
async fn require_owner(
    unit: &mut dyn StoreUnit,
    kind: ResourceKind,
    resource_id: Uuid,
    user_id: UserId,
    action: &str,
) -> AppResult<()> {
    match unit.find_access_level(kind, resource_id, user_id).await? {
        Some(level) if level.can_share() => Ok(()),
        _ => Err(AppError::access_denied(format!(
            "Only the owner may {action} this {kind}"
        ))),
    }
}
