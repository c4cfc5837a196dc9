use tracing::warn;

use crate::error::ApiError;
use crate::soap::{SubscriptionClient, SubscriptionStatus};
use crate::types::UserId;

/// Message returned when a requester may not see a creator's pro content.
pub const ACCESS_DENIED: &str = "Requester don't have access to pro content.";

/// Outcome of one gate evaluation.
///
/// `status` is `None` when the subscription service could not be consulted;
/// `allowed` is then always false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub status: Option<SubscriptionStatus>,
}

impl AccessDecision {
    fn from_status(status: SubscriptionStatus) -> Self {
        Self {
            allowed: status == SubscriptionStatus::Approved,
            status: Some(status),
        }
    }

    fn unavailable() -> Self {
        Self {
            allowed: false,
            status: None,
        }
    }
}

/// Authorization predicate for pro content.
///
/// Every call asks the subscription service afresh; nothing is cached. Any
/// failure to obtain a status denies access.
#[derive(Clone)]
pub struct SubscriptionGate {
    client: SubscriptionClient,
}

impl SubscriptionGate {
    pub fn new(client: SubscriptionClient) -> Self {
        Self { client }
    }

    /// Whether `requester` holds an approved subscription to `owner`.
    pub async fn is_approved(&self, owner: UserId, requester: UserId) -> AccessDecision {
        match self.client.get_status(owner, requester).await {
            Ok(status) => AccessDecision::from_status(status),
            Err(err) => {
                warn!(
                    owner = owner.get(),
                    requester = requester.get(),
                    "subscription status unavailable, denying access: {}",
                    err
                );
                AccessDecision::unavailable()
            }
        }
    }

    /// `Ok(())` only for an approved subscription; otherwise 401.
    pub async fn require_approved(&self, owner: UserId, requester: UserId) -> Result<(), ApiError> {
        if self.is_approved(owner, requester).await.allowed {
            Ok(())
        } else {
            Err(ApiError::unauthorized(ACCESS_DENIED))
        }
    }
}
