// handlers/pro/collections.rs - GET /pro/collection/:collecId[/recipes] handlers

use axum::extract::{Path, State};

use super::stored_owner;
use crate::api::{CollectionView, RecipeView};
use crate::app::AppState;
use crate::database::models::CollectionDetail;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Requester};
use crate::types::{parse_id, UserId};

async fn gated_collection(state: &AppState, raw_id: &str, requester: UserId) -> Result<CollectionDetail, ApiError> {
    let id = parse_id(raw_id)?;
    let detail = state
        .repository
        .find_collection(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Collection not found."))?;

    let owner = stored_owner(detail.collection.user_id)?;
    state.gate.require_approved(owner, requester).await?;
    Ok(detail)
}

/// GET /pro/collection/:collecId
pub async fn collection_get(
    State(state): State<AppState>,
    Path(collection_id): Path<String>,
    Requester(requester): Requester,
) -> ApiResult<CollectionView> {
    let detail = gated_collection(&state, &collection_id, requester).await?;
    Ok(ApiResponse::success(state.media.collection(detail)))
}

/// GET /pro/collection/:collecId/recipes
pub async fn collection_recipes(
    State(state): State<AppState>,
    Path(collection_id): Path<String>,
    Requester(requester): Requester,
) -> ApiResult<Vec<RecipeView>> {
    let detail = gated_collection(&state, &collection_id, requester).await?;
    let recipes = state.repository.collection_recipes(detail.collection.id).await?;
    Ok(ApiResponse::success(state.media.recipes(recipes)))
}
