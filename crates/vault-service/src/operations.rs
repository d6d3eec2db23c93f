//! The capability set every resource kind exposes.
//!
//! Transport adapters resolve the kind once and then call through this
//! trait; grant handling (delete, share, revoke) is shared by every kind and
//! lives in [`AccessService`].

use async_trait::async_trait;
use uuid::Uuid;

use vault_core::result::AppResult;
use vault_core::types::UserId;
use vault_entity::{AccessLevel, ResourceKind};

use crate::access::{AccessService, RevokeRequest, ShareRequest};
use crate::context::RequestContext;

/// A resource key wrapped for one recipient, with the level to grant.
#[derive(Debug, Clone)]
pub struct WrappedKey {
    pub enc_key: Vec<u8>,
    pub key_nonce: Vec<u8>,
    pub access_level: AccessLevel,
}

/// Create, list, update, delete, share, and revoke for one resource kind.
#[async_trait]
pub trait ResourceOperations: Send + Sync {
    /// The kind this implementation manages.
    const KIND: ResourceKind;

    /// Typed identifier of the resource.
    type Id: Copy + Into<Uuid> + Send + Sync + 'static;
    /// Input to `create`.
    type Create: Send + 'static;
    /// Output of `create`.
    type Created: Send + 'static;
    /// Input to `update`.
    type Update: Send + 'static;
    /// Filter accepted by `list`.
    type Filter: Send + 'static;
    /// One row of `list`.
    type Summary: Send + 'static;

    /// Shared grant logic.
    fn access(&self) -> &AccessService;

    /// Create the resource and its OWNER grant as one unit.
    async fn create(&self, ctx: &RequestContext, req: Self::Create) -> AppResult<Self::Created>;

    /// Resources the caller holds a grant on.
    async fn list(&self, ctx: &RequestContext, filter: Self::Filter)
    -> AppResult<Vec<Self::Summary>>;

    /// Replace the encrypted payload.
    async fn update(&self, ctx: &RequestContext, id: Self::Id, req: Self::Update) -> AppResult<()>;

    /// Soft-delete; OWNER only.
    async fn delete(&self, ctx: &RequestContext, id: Self::Id) -> AppResult<()> {
        self.access().delete(ctx, Self::KIND, id.into()).await
    }

    /// Grant `target` access with a key wrapped for them; OWNER only.
    async fn share(
        &self,
        ctx: &RequestContext,
        id: Self::Id,
        target_user_id: UserId,
        key: WrappedKey,
    ) -> AppResult<()> {
        let req = ShareRequest {
            target_user_id,
            resource_id: id.into(),
            resource_kind: Self::KIND,
            enc_key: key.enc_key,
            key_nonce: key.key_nonce,
            access_level: key.access_level,
        };
        self.access().share(ctx, req).await
    }

    /// Remove `target`'s grant; OWNER only.
    async fn revoke(
        &self,
        ctx: &RequestContext,
        id: Self::Id,
        target_user_id: UserId,
    ) -> AppResult<()> {
        let req = RevokeRequest {
            target_user_id,
            resource_id: id.into(),
            resource_kind: Some(Self::KIND),
        };
        self.access().revoke(ctx, req).await
    }
}

/// Re-tag a store failure during creation as `CreateFailed`; refusals
/// decided before any write keep their kind.
pub(crate) fn create_failed(err: vault_core::AppError, what: &str) -> vault_core::AppError {
    use vault_core::ErrorKind;
    match err.kind {
        ErrorKind::Validation
        | ErrorKind::NotFound
        | ErrorKind::AccessDenied
        | ErrorKind::TransactionFailure => err,
        _ => err.context(ErrorKind::CreateFailed, format!("Failed to create {what}")),
    }
}
