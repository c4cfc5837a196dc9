use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::envelope::build_envelope;
use super::error::SubscriptionError;
use super::parser::{parse_response, ParsedFields};
use super::transport::{HttpTransport, SoapTransport};
use super::types::{CommandOutcome, SoapAction, SubscriptionRecord, SubscriptionStatus};
use crate::config::SubscriptionConfig;
use crate::types::UserId;

/// Typed client for the legacy subscription service.
///
/// Cheap to clone and free of per-request state; concurrent calls share
/// nothing but the transport handle and the secret.
#[derive(Clone)]
pub struct SubscriptionClient {
    transport: Arc<dyn SoapTransport>,
    secret: Arc<str>,
}

impl SubscriptionClient {
    pub fn new(transport: Arc<dyn SoapTransport>, secret: impl Into<String>) -> Self {
        Self {
            transport,
            secret: Arc::from(secret.into()),
        }
    }

    pub fn from_config(config: &SubscriptionConfig) -> Result<Self, SubscriptionError> {
        let transport = HttpTransport::new(&config.url, Duration::from_millis(config.timeout_ms))?;
        Ok(Self::new(Arc::new(transport), config.key.clone()))
    }

    /// Send `action` with positional `args` (after the secret) and decode the reply.
    pub async fn query(&self, action: SoapAction, args: &[String]) -> Result<ParsedFields, SubscriptionError> {
        if args.len() != action.arity() {
            return Err(SubscriptionError::Arity {
                action: action.name(),
                expected: action.arity(),
                got: args.len(),
            });
        }

        debug!(action = action.name(), "calling subscription service");
        let envelope = build_envelope(action, &self.secret, args);
        let body = self.transport.send(envelope).await?;
        parse_response(action, &body)
    }

    pub async fn get_status(&self, creator: UserId, subscriber: UserId) -> Result<SubscriptionStatus, SubscriptionError> {
        let fields = self
            .query(SoapAction::GetStatus, &[creator.to_string(), subscriber.to_string()])
            .await?;
        fields.single_scalar()?.parse()
    }

    /// Pending queue. A record that does not decode is logged and skipped.
    pub async fn pending_subscriptions(&self) -> Result<Vec<SubscriptionRecord>, SubscriptionError> {
        let fields = self.query(SoapAction::GetPendingSubs, &[]).await?;
        let records = fields
            .records()?
            .into_iter()
            .filter_map(|record| match decode_record(record) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    warn!("skipping pending subscription record: {}", err);
                    None
                }
            })
            .collect();
        Ok(records)
    }

    pub async fn approve(&self, creator: UserId, subscriber: UserId) -> Result<CommandOutcome, SubscriptionError> {
        self.command(SoapAction::Approve, creator, subscriber).await
    }

    pub async fn reject(&self, creator: UserId, subscriber: UserId) -> Result<CommandOutcome, SubscriptionError> {
        self.command(SoapAction::Reject, creator, subscriber).await
    }

    /// Run an approve or reject command. Any other action is refused before sending.
    pub async fn command(&self, action: SoapAction, creator: UserId, subscriber: UserId) -> Result<CommandOutcome, SubscriptionError> {
        if !action.is_command() {
            return Err(SubscriptionError::NotACommand(action.name()));
        }
        let fields = self
            .query(action, &[creator.to_string(), subscriber.to_string()])
            .await?;
        Ok(CommandOutcome::classify(action, fields.single_scalar()?.to_string()))
    }
}

fn decode_record(record: &std::collections::BTreeMap<String, String>) -> Result<SubscriptionRecord, SubscriptionError> {
    Ok(SubscriptionRecord {
        creator_id: numeric_field(record, "creatorID")?,
        status: text_field(record, "status")?.parse()?,
        subscriber_email: text_field(record, "subscriberEmail")?.to_string(),
        subscriber_id: numeric_field(record, "subscriberID")?,
    })
}

fn text_field<'a>(
    record: &'a std::collections::BTreeMap<String, String>,
    name: &str,
) -> Result<&'a str, SubscriptionError> {
    record
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| SubscriptionError::MissingElement(format!("return/{}", name)))
}

fn numeric_field(record: &std::collections::BTreeMap<String, String>, name: &str) -> Result<i32, SubscriptionError> {
    let raw = text_field(record, name)?;
    raw.trim()
        .parse()
        .map_err(|_| SubscriptionError::UnexpectedValue(format!("{} is not a number: '{}'", name, raw)))
}
