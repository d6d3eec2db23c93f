//! Kind-generic resource handlers: soft delete and grant listing.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use vault_core::result::AppResult;
use vault_entity::ResourceKind;
use vault_service::{RequestContext, ResourceOperations};

use crate::dto::response::{ApiResponse, GrantResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::extractors::path::{parse_kind, parse_uuid};
use crate::state::AppState;

/// DELETE /v1/resources/{kind}/{id}
pub async fn delete_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;
    let id = parse_uuid(&id)?;

    match kind {
        ResourceKind::Folder => delete_as(state.folder_service.as_ref(), &auth, id).await?,
        ResourceKind::Item => delete_as(state.item_service.as_ref(), &auth, id).await?,
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/resources/{kind}/{id}/grants
pub async fn list_grants(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Vec<GrantResponse>>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let id = parse_uuid(&id)?;

    let grants = state.access_service.list_grants(&auth, kind, id).await?;
    Ok(Json(ApiResponse::ok(
        grants.into_iter().map(GrantResponse::from).collect(),
    )))
}

async fn delete_as<R>(ops: &R, ctx: &RequestContext, id: Uuid) -> AppResult<()>
where
    R: ResourceOperations,
    R::Id: From<Uuid>,
{
    ops.delete(ctx, R::Id::from(id)).await
}
