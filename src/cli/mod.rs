pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "cooklyst")]
#[command(about = "Cooklyst CLI - operator tools for the subscription service and API tokens")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Query and manage the legacy subscription service")]
    Subscription {
        #[command(subcommand)]
        cmd: commands::subscription::SubscriptionCommands,
    },

    #[command(about = "Mint a bearer token for development and operations")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Subscription { cmd } => commands::subscription::handle(cmd, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subscription_approve() {
        let cli = Cli::try_parse_from([
            "cooklyst", "--json", "subscription", "approve", "--creator", "7", "--subscriber", "42",
        ])
        .unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Subscription {
                cmd: commands::subscription::SubscriptionCommands::Approve { .. }
            }
        ));
    }

    #[test]
    fn rejects_non_positive_ids() {
        assert!(Cli::try_parse_from(["cooklyst", "subscription", "status", "--creator", "0", "--subscriber", "1"]).is_err());
        assert!(Cli::try_parse_from(["cooklyst", "token", "--user-id", "abc"]).is_err());
    }
}
