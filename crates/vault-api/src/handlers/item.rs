//! Item handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use vault_core::types::id::non_nil;
use vault_core::types::{FolderId, ItemId};
use vault_service::{CreateItemRequest as SvcCreateItem, UpdateItemRequest as SvcUpdateItem};

use crate::dto::request::{CreateItemRequest, ListItemsQuery, UpdateItemRequest};
use crate::dto::response::{ApiResponse, CreatedItemResponse, ItemResponse, ItemSummaryResponse};
use crate::error::ApiError;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /v1/items
pub async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedItemResponse>>), ApiError> {
    let created = state
        .item_service
        .create(
            &auth,
            SvcCreateItem {
                folder_id: req.folder_id,
                item_type: req.item_type,
                enc_data: req.enc_data,
                data_nonce: req.data_nonce,
                enc_overview: req.enc_overview,
                overview_nonce: req.overview_nonce,
                enc_key: req.enc_key,
                key_nonce: req.key_nonce,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CreatedItemResponse { id: created.id })),
    ))
}

/// GET /v1/items?folder_id=...
pub async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ApiResponse<Vec<ItemSummaryResponse>>>, ApiError> {
    let folder_id = match query.folder_id.as_deref() {
        None | Some("") => None,
        Some(raw) => non_nil::<FolderId>(Some(parse_uuid(raw)?)),
    };

    let items = state.item_service.list(&auth, folder_id).await?;
    Ok(Json(ApiResponse::ok(
        items.into_iter().map(ItemSummaryResponse::from).collect(),
    )))
}

/// GET /v1/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ItemResponse>>, ApiError> {
    let id = ItemId::from(parse_uuid(&id)?);
    let item = state.item_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(item.into())))
}

/// PUT /v1/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateItemRequest>,
) -> Result<StatusCode, ApiError> {
    let id = ItemId::from(parse_uuid(&id)?);
    state
        .item_service
        .update(
            &auth,
            id,
            SvcUpdateItem {
                enc_data: req.enc_data,
                data_nonce: req.data_nonce,
                enc_overview: req.enc_overview,
                overview_nonce: req.overview_nonce,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
