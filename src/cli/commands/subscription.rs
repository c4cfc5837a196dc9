use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config;
use crate::soap::{CommandOutcome, SubscriptionClient};
use crate::types::UserId;

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    #[command(about = "Show a subscriber's status for a creator")]
    Status {
        #[arg(long, help = "Creator (content owner) id")]
        creator: UserId,
        #[arg(long, help = "Subscriber (requester) id")]
        subscriber: UserId,
    },

    #[command(about = "List pending subscription requests")]
    Pending,

    #[command(about = "Approve a pending subscription request")]
    Approve {
        #[arg(long, help = "Creator (content owner) id")]
        creator: UserId,
        #[arg(long, help = "Subscriber (requester) id")]
        subscriber: UserId,
    },

    #[command(about = "Reject a pending subscription request")]
    Reject {
        #[arg(long, help = "Creator (content owner) id")]
        creator: UserId,
        #[arg(long, help = "Subscriber (requester) id")]
        subscriber: UserId,
    },
}

pub async fn handle(cmd: SubscriptionCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let settings = &config::config().subscription;
    if settings.key.is_empty() {
        anyhow::bail!("SOAP_KEY is not set");
    }
    let client = SubscriptionClient::from_config(settings)?;

    match cmd {
        SubscriptionCommands::Status { creator, subscriber } => {
            let status = client.get_status(creator, subscriber).await?;
            output_success(
                &output_format,
                &format!("Subscriber {} → creator {}: {}", subscriber, creator, status),
                Some(json!({ "creatorID": creator, "subscriberID": subscriber, "status": status })),
            )
        }
        SubscriptionCommands::Pending => {
            let pending = client.pending_subscriptions().await?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "pending": pending }))?);
                }
                OutputFormat::Text => {
                    if pending.is_empty() {
                        println!("No pending subscription requests");
                    }
                    for record in &pending {
                        println!(
                            "creator {:>6}  subscriber {:>6}  {:<9} {}",
                            record.creator_id, record.subscriber_id, record.status, record.subscriber_email
                        );
                    }
                }
            }
            Ok(())
        }
        SubscriptionCommands::Approve { creator, subscriber } => {
            let outcome = client.approve(creator, subscriber).await?;
            report(outcome, &output_format)
        }
        SubscriptionCommands::Reject { creator, subscriber } => {
            let outcome = client.reject(creator, subscriber).await?;
            report(outcome, &output_format)
        }
    }
}

fn report(outcome: CommandOutcome, output_format: &OutputFormat) -> anyhow::Result<()> {
    match outcome {
        CommandOutcome::Success(message) => output_success(output_format, &message, None),
        CommandOutcome::NotFound(message) => {
            output_error(output_format, &message, Some("NOT_FOUND"))?;
            anyhow::bail!("subscription request not found")
        }
        CommandOutcome::Failed(message) => {
            output_error(output_format, &message, Some("FAILED"))?;
            anyhow::bail!("subscription service did not confirm the command")
        }
    }
}
