// handlers/collection/members.rs - /collection/:id/recipes handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use super::owned_collection;
use crate::api::{CollectionView, RecipeView};
use crate::app::AppState;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{parse_id, RawId};

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub recipe_id: Option<RawId>,
}

/// GET /collection/:id/recipes
pub async fn collection_recipe_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Vec<RecipeView>> {
    let detail = owned_collection(&state, &identity, &id).await?;
    let recipes = state.repository.collection_recipes(detail.collection.id).await?;
    Ok(ApiResponse::success(state.media.recipes(recipes)))
}

/**
 * POST /collection/:id/recipes - Link one of the caller's recipes
 *
 * Expected Input:
 * ```json
 * { "recipe_id": 12 }
 * ```
 */
pub async fn collection_recipe_add(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<Json<RecipeRequest>, JsonRejection>,
) -> ApiResult<CollectionView> {
    let detail = owned_collection(&state, &identity, &id).await?;

    let Json(request) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let recipe_id = request
        .recipe_id
        .ok_or_else(|| ApiError::bad_request("Field recipe_id cannot be empty."))?
        .to_id()
        .ok_or_else(|| ApiError::bad_request("Invalid id parameter."))?;

    let recipe = state
        .repository
        .find_recipe(recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found."))?;
    if recipe.user_id != identity.id.get() {
        return Err(ApiError::unauthorized("Requester is not the owner of this recipe."));
    }

    let collection_id = detail.collection.id;
    if !state.repository.add_recipe_to_collection(collection_id, recipe_id).await? {
        return Err(ApiError::bad_request("Recipe already in collection."));
    }

    let updated = state
        .repository
        .find_collection(collection_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Collection not found."))?;
    Ok(ApiResponse::success(state.media.collection(updated)))
}

/// DELETE /collection/:id/recipes/:recipeId
pub async fn collection_recipe_remove(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((id, recipe_id)): Path<(String, String)>,
) -> ApiResult<CollectionView> {
    let detail = owned_collection(&state, &identity, &id).await?;
    let recipe_id = parse_id(&recipe_id)?;

    let collection_id = detail.collection.id;
    if !state.repository.remove_recipe_from_collection(collection_id, recipe_id).await? {
        return Err(ApiError::not_found("Recipe not found in collection."));
    }

    let updated = state
        .repository
        .find_collection(collection_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Collection not found."))?;
    Ok(ApiResponse::success(state.media.collection(updated)))
}
