/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Database identifier of a user (creator, subscriber or admin).
///
/// Always a positive integer. Parsing rejects zero, negatives and anything
/// that is not a plain decimal number, so a malformed id never reaches the
/// repository or the legacy subscription service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    pub fn new(id: i32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id '{0}'")]
pub struct InvalidId(pub String);

impl FromStr for UserId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_positive(s).map(Self).ok_or_else(|| InvalidId(s.to_string()))
    }
}

/// Parse a positive decimal id. Signs, whitespace and leading `+` are rejected.
fn parse_positive(s: &str) -> Option<i32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<i32>().ok().filter(|id| *id > 0)
}

/// Parse a path parameter holding a resource id (collection or recipe).
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    parse_positive(raw).ok_or_else(|| ApiError::bad_request("Invalid id parameter."))
}

/// Parse a path parameter holding a creator id.
pub fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse().map_err(|_| ApiError::bad_request("Invalid id parameter."))
}

/// Id as it may arrive in a JSON body: clients send either a number or a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    pub fn to_user_id(&self) -> Option<UserId> {
        match self {
            RawId::Number(n) => i32::try_from(*n).ok().and_then(UserId::new),
            RawId::Text(s) => s.parse().ok(),
        }
    }

    pub fn to_id(&self) -> Option<i32> {
        self.to_user_id().map(UserId::get)
    }
}
