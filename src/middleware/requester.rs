use axum::{extract::FromRequestParts, extract::Query, http::request::Parts};
use serde::Deserialize;

use crate::error::ApiError;
use crate::types::UserId;

/// The caller attempting pro access, taken from the `requesterID` query
/// parameter and validated before any handler logic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester(pub UserId);

#[derive(Debug, Deserialize)]
struct RequesterQuery {
    #[serde(rename = "requesterID")]
    requester_id: Option<String>,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<RequesterQuery>::try_from_uri(&parts.uri)
            .map_err(|_| ApiError::bad_request("Invalid requesterID parameter."))?;

        let raw = query
            .requester_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::bad_request("Field requesterID cannot be empty."))?;

        raw.parse::<UserId>()
            .map(Requester)
            .map_err(|_| ApiError::bad_request("Invalid requesterID parameter."))
    }
}
