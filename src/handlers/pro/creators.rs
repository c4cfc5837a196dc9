// handlers/pro/creators.rs - GET /pro/creator[/:creatorId/...] handlers

use axum::extract::{Path, State};
use futures::future::join_all;
use serde::Serialize;

use crate::api::{CollectionView, CreatorStatus, RecipeView};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Requester};
use crate::types::{parse_user_id, UserId};

/**
 * GET /pro/creator - Every creator with the requester's subscription status
 *
 * One gate call per creator, issued concurrently. Output order follows the
 * repository listing. A creator whose status cannot be obtained is listed
 * with `subsStatus: null`.
 */
pub async fn creator_list(
    State(state): State<AppState>,
    Requester(requester): Requester,
) -> ApiResult<Vec<CreatorStatus>> {
    let creators = state.repository.list_creators().await?;

    let lookups = creators.into_iter().map(|creator| {
        let gate = state.gate.clone();
        async move {
            let status = match UserId::new(creator.id) {
                Some(owner) => gate.is_approved(owner, requester).await.status,
                None => None,
            };
            CreatorStatus::new(creator, status)
        }
    });

    Ok(ApiResponse::success(join_all(lookups).await))
}

#[derive(Debug, Serialize)]
pub struct CreatorCollections {
    pub collections: Vec<CollectionView>,
    pub creator_id: i32,
    pub creator_name: String,
}

/// GET /pro/creator/:creatorId/collection
pub async fn creator_collections(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Requester(requester): Requester,
) -> ApiResult<CreatorCollections> {
    let owner = parse_user_id(&creator_id)?;
    let creator = state
        .repository
        .find_creator(owner)
        .await?
        .ok_or_else(|| ApiError::not_found("Creator not found."))?;

    state.gate.require_approved(owner, requester).await?;

    let collections = state
        .repository
        .collections_by_owner(owner)
        .await?
        .into_iter()
        .map(|detail| state.media.collection(detail))
        .collect();

    Ok(ApiResponse::success(CreatorCollections {
        collections,
        creator_id: creator.id,
        creator_name: creator.name,
    }))
}

/// GET /pro/creator/:creatorId/recipes
pub async fn creator_recipes(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Requester(requester): Requester,
) -> ApiResult<Vec<RecipeView>> {
    let owner = parse_user_id(&creator_id)?;
    state
        .repository
        .find_creator(owner)
        .await?
        .ok_or_else(|| ApiError::not_found("Creator not found."))?;

    state.gate.require_approved(owner, requester).await?;

    let recipes = state.repository.recipes_by_owner(owner).await?;
    Ok(ApiResponse::success(state.media.recipes(recipes)))
}
