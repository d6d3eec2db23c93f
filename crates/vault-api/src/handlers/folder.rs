//! Folder handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use vault_core::types::FolderId;
use vault_service::{
    CreateFolderRequest as SvcCreateFolder, UpdateFolderRequest as SvcUpdateFolder,
};

use crate::dto::request::{CreateFolderRequest, UpdateFolderRequest};
use crate::dto::response::{ApiResponse, CreatedFolderResponse, FolderResponse};
use crate::error::ApiError;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /v1/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedFolderResponse>>), ApiError> {
    let created = state
        .folder_service
        .create(
            &auth,
            SvcCreateFolder {
                parent_id: req.parent_id,
                enc_name: req.enc_name,
                name_nonce: req.name_nonce,
                enc_key: req.enc_key,
                key_nonce: req.key_nonce,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CreatedFolderResponse {
            id: created.id,
            parent_id: created.parent_id,
        })),
    ))
}

/// GET /v1/folders
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<FolderResponse>>>, ApiError> {
    let folders = state.folder_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(
        folders.into_iter().map(FolderResponse::from).collect(),
    )))
}

/// GET /v1/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FolderResponse>>, ApiError> {
    let id = FolderId::from(parse_uuid(&id)?);
    let folder = state.folder_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(folder.into())))
}

/// PUT /v1/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateFolderRequest>,
) -> Result<StatusCode, ApiError> {
    let id = FolderId::from(parse_uuid(&id)?);
    state
        .folder_service
        .update(
            &auth,
            id,
            SvcUpdateFolder {
                enc_name: req.enc_name,
                name_nonce: req.name_nonce,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
