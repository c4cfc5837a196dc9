// handlers/collection/mod.rs - Owner collection handlers (JWT required)
//
// Plain CRUD over the caller's own collections. Unlike the pro surface,
// resource owner and caller must be the same identity; no subscription
// lookup is involved.
//
// Security Level: JWT Authentication Required
// Route Prefix: /collection*
// Middleware: jwt_auth_middleware

pub mod members;
pub mod records;

pub use members::{collection_recipe_add, collection_recipe_list, collection_recipe_remove};
pub use records::{collection_create, collection_delete, collection_get, collection_list, collection_update};

use crate::app::AppState;
use crate::auth::Identity;
use crate::database::models::CollectionDetail;
use crate::error::ApiError;
use crate::types::parse_id;

/// Load a collection and insist the caller owns it.
pub(crate) async fn owned_collection(
    state: &AppState,
    identity: &Identity,
    raw_id: &str,
) -> Result<CollectionDetail, ApiError> {
    let id = parse_id(raw_id)?;
    let detail = state
        .repository
        .find_collection(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Collection not found."))?;

    if detail.collection.user_id != identity.id.get() {
        return Err(ApiError::unauthorized("Requester is not the owner of this collection."));
    }
    Ok(detail)
}
