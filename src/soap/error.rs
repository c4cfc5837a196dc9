use std::time::Duration;
use thiserror::Error;

/// Failures of a single call to the subscription service.
///
/// Every variant is a transport-level failure from the caller's point of
/// view: the gate fails closed on all of them and admin handlers surface
/// them as a generic server error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubscriptionError {
    #[error("subscription service unreachable: {0}")]
    Transport(String),

    #[error("subscription service timed out after {0:?}")]
    Timeout(Duration),

    #[error("subscription service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("subscription service fault: {0}")]
    Fault(String),

    #[error("malformed XML response: {0}")]
    MalformedXml(String),

    #[error("missing element in response: {0}")]
    MissingElement(String),

    #[error("unexpected value in response: {0}")]
    UnexpectedValue(String),

    #[error("{0} is not an approve/reject command")]
    NotACommand(&'static str),

    #[error("{action} takes {expected} argument(s), got {got}")]
    Arity {
        action: &'static str,
        expected: usize,
        got: usize,
    },
}
