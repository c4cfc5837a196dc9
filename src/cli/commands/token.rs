use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::types::UserId;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "User id the token identifies")]
    pub user_id: UserId,

    #[arg(long, help = "Grant the admin flag")]
    pub admin: bool,

    #[arg(long, help = "Lifetime in hours (defaults to SECRET_ACCESS_EXPIRES_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;
    let hours = args.hours.unwrap_or(security.jwt_expiry_hours);

    let claims = Claims::new(args.user_id, args.admin, hours);
    let expires_at = claims.exp;
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "user_id": args.user_id, "is_admin": args.admin, "exp": expires_at })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
