use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SubscriptionError;

/// Operations exposed by the legacy subscription service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoapAction {
    GetStatus,
    GetPendingSubs,
    Approve,
    Reject,
}

impl SoapAction {
    /// Element name of the request body, also the prefix of the response element.
    pub fn name(&self) -> &'static str {
        match self {
            SoapAction::GetStatus => "getStatus",
            SoapAction::GetPendingSubs => "getPendingSubs",
            SoapAction::Approve => "approve",
            SoapAction::Reject => "reject",
        }
    }

    /// Number of positional arguments after the shared secret.
    /// Order is creator id, then subscriber id.
    pub fn arity(&self) -> usize {
        match self {
            SoapAction::GetPendingSubs => 0,
            SoapAction::GetStatus | SoapAction::Approve | SoapAction::Reject => 2,
        }
    }

    /// Whether the action answers with an outcome phrase.
    pub fn is_command(&self) -> bool {
        matches!(self, SoapAction::Approve | SoapAction::Reject)
    }

    pub fn response_element(&self) -> String {
        format!("{}Response", self.name())
    }
}

impl fmt::Display for SoapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subscription state as reported by the legacy service.
///
/// There is deliberately no "unknown" variant: a failed or unparsable lookup
/// is an `Err(SubscriptionError)`, and callers that need a marker for it use
/// `Option<SubscriptionStatus>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "PENDING",
            SubscriptionStatus::Approved => "APPROVED",
            SubscriptionStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(SubscriptionStatus::Pending),
            "APPROVED" => Ok(SubscriptionStatus::Approved),
            "REJECTED" => Ok(SubscriptionStatus::Rejected),
            other => Err(SubscriptionError::UnexpectedValue(format!(
                "unknown subscription status '{}'",
                other
            ))),
        }
    }
}

/// Entry of the pending-subscription queue. Read-only projection; the legacy
/// service owns this data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    #[serde(rename = "creatorID")]
    pub creator_id: i32,
    pub status: SubscriptionStatus,
    #[serde(rename = "subscriberEmail")]
    pub subscriber_email: String,
    #[serde(rename = "subscriberID")]
    pub subscriber_id: i32,
}

/// Result of an approve/reject command.
///
/// The service answers with free text; the text is kept for display but
/// callers branch on the variant only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    NotFound(String),
    Success(String),
    Failed(String),
}

impl CommandOutcome {
    pub const NOT_FOUND_PHRASE: &'static str = "No subscription request found";
    pub const APPROVED_PHRASE: &'static str = "Successfully approved subscription request";
    pub const REJECTED_PHRASE: &'static str = "Successfully rejected subscription request";

    /// Classify the reply to `action`. Only the exact known phrases count;
    /// anything else is a failure, never a success.
    pub fn classify(action: SoapAction, text: String) -> Self {
        // The legacy service confirms an approval with the reject wording.
        let success_phrases: &[&str] = match action {
            SoapAction::Approve => &[Self::REJECTED_PHRASE, Self::APPROVED_PHRASE],
            SoapAction::Reject => &[Self::REJECTED_PHRASE],
            SoapAction::GetStatus | SoapAction::GetPendingSubs => &[],
        };

        if text == Self::NOT_FOUND_PHRASE {
            CommandOutcome::NotFound(text)
        } else if success_phrases.contains(&text.as_str()) {
            CommandOutcome::Success(text)
        } else {
            CommandOutcome::Failed(text)
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CommandOutcome::NotFound(m) | CommandOutcome::Success(m) | CommandOutcome::Failed(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success(_))
    }
}
