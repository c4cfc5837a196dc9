// handlers/pro/mod.rs - Pro content handlers (app key + requesterID required)
//
// Read paths over another creator's content. Every handler resolves the
// owning creator, then asks the subscription gate whether the requester
// holds an approved subscription to that creator. Nothing is released
// before the gate says yes.
//
// Security Level: X-API-KEY (trusted front end) + gate per request
// Route Prefix: /pro/*
// Middleware: app_key_middleware; caller identity via the Requester extractor

pub mod collections;
pub mod creators;
pub mod recipes;

pub use collections::{collection_get, collection_recipes};
pub use creators::{creator_collections, creator_list, creator_recipes};
pub use recipes::{recipe_get, recipe_video};

use crate::error::ApiError;
use crate::types::UserId;

/// Owner id as stored on a row. The schema only ever holds positive ids, so
/// anything else is a data fault, not a client error.
pub(crate) fn stored_owner(user_id: i32) -> Result<UserId, ApiError> {
    UserId::new(user_id).ok_or_else(|| {
        tracing::error!("stored owner id {} is not a valid user id", user_id);
        ApiError::internal_server_error("Internal Server Error")
    })
}
