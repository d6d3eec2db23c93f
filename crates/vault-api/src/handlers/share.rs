//! Share and revoke handlers.

use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use vault_core::result::AppResult;
use vault_core::types::UserId;
use vault_entity::ResourceKind;
use vault_service::{RequestContext, ResourceOperations, RevokeRequest as SvcRevoke, WrappedKey};

use crate::dto::request::{RevokeRequest, ShareRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /v1/share
pub async fn share_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ShareRequest>,
) -> Result<StatusCode, ApiError> {
    let key = WrappedKey {
        enc_key: req.enc_key,
        key_nonce: req.key_nonce,
        access_level: req.access_level,
    };
    let (id, target) = (req.resource_id, req.target_user_id);

    match req.resource_kind {
        ResourceKind::Folder => {
            share_as(state.folder_service.as_ref(), &auth, id, target, key).await?
        }
        ResourceKind::Item => share_as(state.item_service.as_ref(), &auth, id, target, key).await?,
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/share/revoke
pub async fn revoke_access(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<RevokeRequest>,
) -> Result<StatusCode, ApiError> {
    let (id, target) = (req.resource_id, req.target_user_id);

    match req.resource_kind {
        Some(ResourceKind::Folder) => {
            revoke_as(state.folder_service.as_ref(), &auth, id, target).await?
        }
        Some(ResourceKind::Item) => {
            revoke_as(state.item_service.as_ref(), &auth, id, target).await?
        }
        None => {
            state
                .access_service
                .revoke(
                    &auth,
                    SvcRevoke {
                        target_user_id: target,
                        resource_id: id,
                        resource_kind: None,
                    },
                )
                .await?
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn share_as<R>(
    ops: &R,
    ctx: &RequestContext,
    id: Uuid,
    target: UserId,
    key: WrappedKey,
) -> AppResult<()>
where
    R: ResourceOperations,
    R::Id: From<Uuid>,
{
    ops.share(ctx, R::Id::from(id), target, key).await
}

async fn revoke_as<R>(ops: &R, ctx: &RequestContext, id: Uuid, target: UserId) -> AppResult<()>
where
    R: ResourceOperations,
    R::Id: From<Uuid>,
{
    ops.revoke(ctx, R::Id::from(id), target).await
}
