// handlers/collection/records.rs - /collection and /collection/:id handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use super::owned_collection;
use crate::api::CollectionView;
use crate::app::AppState;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: Option<String>,
}

impl TitleRequest {
    fn title(body: Result<Json<TitleRequest>, JsonRejection>) -> Result<String, ApiError> {
        let Json(request) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;
        request
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::bad_request("Field title cannot be empty."))
    }
}

/// GET /collection - The caller's collections
pub async fn collection_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Vec<CollectionView>> {
    let collections = state.repository.collections_by_owner(identity.id).await?;
    Ok(ApiResponse::success(
        collections.into_iter().map(|c| state.media.collection(c)).collect(),
    ))
}

/// GET /collection/:id
pub async fn collection_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<CollectionView> {
    let detail = owned_collection(&state, &identity, &id).await?;
    Ok(ApiResponse::success(state.media.collection(detail)))
}

/// POST /collection
pub async fn collection_create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<TitleRequest>, JsonRejection>,
) -> ApiResult<CollectionView> {
    let title = TitleRequest::title(body)?;
    let collection = state.repository.create_collection(identity.id, &title).await?;
    tracing::info!(owner = identity.id.get(), collection = collection.id, "collection created");

    let detail = state
        .repository
        .find_collection(collection.id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Internal Server Error"))?;
    Ok(ApiResponse::created(state.media.collection(detail)))
}

/// PUT /collection/:id - Rename
pub async fn collection_update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<Json<TitleRequest>, JsonRejection>,
) -> ApiResult<CollectionView> {
    let mut detail = owned_collection(&state, &identity, &id).await?;
    let title = TitleRequest::title(body)?;

    state.repository.rename_collection(detail.collection.id, &title).await?;
    detail.collection.title = title;
    Ok(ApiResponse::success(state.media.collection(detail)))
}

/// DELETE /collection/:id
pub async fn collection_delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<CollectionView> {
    let detail = owned_collection(&state, &identity, &id).await?;
    state.repository.delete_collection(detail.collection.id).await?;
    Ok(ApiResponse::success(state.media.collection(detail)).with_message("Collection deleted."))
}
