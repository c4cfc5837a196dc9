// handlers/pro/recipes.rs - GET /pro/recipe/:recipeId[/video] handlers

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

use super::stored_owner;
use crate::api::RecipeView;
use crate::app::AppState;
use crate::database::models::Recipe;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Requester};
use crate::types::{parse_id, UserId};

async fn gated_recipe(state: &AppState, raw_id: &str, requester: UserId) -> Result<Recipe, ApiError> {
    let id = parse_id(raw_id)?;
    let recipe = state
        .repository
        .find_recipe(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found."))?;

    state.gate.require_approved(stored_owner(recipe.user_id)?, requester).await?;
    Ok(recipe)
}

/// GET /pro/recipe/:recipeId
pub async fn recipe_get(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Requester(requester): Requester,
) -> ApiResult<RecipeView> {
    let recipe = gated_recipe(&state, &recipe_id, requester).await?;
    Ok(ApiResponse::success(state.media.recipe(recipe)))
}

/**
 * GET /pro/recipe/:recipeId/video - Stream the recipe video
 *
 * The stored file name never leaves the server; the body is the raw file.
 */
pub async fn recipe_video(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Requester(requester): Requester,
) -> Result<Response, ApiError> {
    let recipe = gated_recipe(&state, &recipe_id, requester).await?;
    let (file, len) = state.store.open_video(&recipe.video_path).await?;

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "video/mp4".to_string()),
            (header::CONTENT_LENGTH, len.to_string()),
        ],
        body,
    )
        .into_response())
}
