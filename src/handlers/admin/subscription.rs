// handlers/admin/subscription.rs - GET /subscription, POST /subscription/{approve,reject}

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::require_admin;
use crate::app::AppState;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::soap::{CommandOutcome, SoapAction, SubscriptionRecord};
use crate::types::{RawId, UserId};

/// GET /subscription - Pending subscription requests, as the legacy service reports them
pub async fn subscription_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Vec<SubscriptionRecord>> {
    require_admin(&identity)?;
    let pending = state.subscriptions.pending_subscriptions().await?;
    Ok(ApiResponse::success(pending))
}

/// Body of approve/reject. Ids may arrive as numbers or numeric strings.
#[derive(Debug, Deserialize)]
pub struct SubscriptionDecisionRequest {
    #[serde(rename = "creatorID")]
    pub creator_id: Option<RawId>,
    #[serde(rename = "subscriberID")]
    pub subscriber_id: Option<RawId>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionDecision {
    #[serde(rename = "creatorID")]
    pub creator_id: UserId,
    #[serde(rename = "subscriberID")]
    pub subscriber_id: UserId,
}

impl SubscriptionDecisionRequest {
    fn validate(self) -> Result<SubscriptionDecision, ApiError> {
        let (creator, subscriber) = match (self.creator_id, self.subscriber_id) {
            (Some(c), Some(s)) => (c, s),
            _ => return Err(ApiError::bad_request("Field creatorID and subscriberID cannot be empty.")),
        };

        match (creator.to_user_id(), subscriber.to_user_id()) {
            (Some(creator_id), Some(subscriber_id)) => Ok(SubscriptionDecision { creator_id, subscriber_id }),
            _ => Err(ApiError::bad_request("Invalid id parameter.")),
        }
    }
}

/// POST /subscription/approve
pub async fn subscription_approve(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<SubscriptionDecisionRequest>, JsonRejection>,
) -> ApiResult<SubscriptionDecision> {
    decide(&state, &identity, body, SoapAction::Approve).await
}

/// POST /subscription/reject
pub async fn subscription_reject(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<SubscriptionDecisionRequest>, JsonRejection>,
) -> ApiResult<SubscriptionDecision> {
    decide(&state, &identity, body, SoapAction::Reject).await
}

async fn decide(
    state: &AppState,
    identity: &Identity,
    body: Result<Json<SubscriptionDecisionRequest>, JsonRejection>,
    action: SoapAction,
) -> ApiResult<SubscriptionDecision> {
    require_admin(identity)?;

    let Json(request) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let decision = request.validate()?;

    let outcome = state
        .subscriptions
        .command(action, decision.creator_id, decision.subscriber_id)
        .await?;

    match outcome {
        CommandOutcome::Success(message) => {
            tracing::info!(
                admin = identity.id.get(),
                creator = decision.creator_id.get(),
                subscriber = decision.subscriber_id.get(),
                "subscription {} accepted",
                action
            );
            Ok(ApiResponse::success(decision).with_message(message))
        }
        CommandOutcome::NotFound(message) => Err(ApiError::not_found(message)),
        CommandOutcome::Failed(message) => {
            tracing::warn!("subscription service did not confirm {}: {}", action, message);
            Err(ApiError::bad_request(format!("Failed to {} subscription request.", action)))
        }
    }
}
