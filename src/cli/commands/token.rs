use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims, ADMIN_ROLE};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a bearer token signed with the local JWT_SECRET")]
    Mint {
        #[arg(long, help = "User ID to embed")]
        user_id: i32,

        #[arg(long, help = "Username to embed")]
        username: String,

        #[arg(long, default_value = ADMIN_ROLE, help = "Role to embed")]
        role: String,

        #[arg(long, help = "Lifetime in hours (defaults to configured expiry)")]
        hours: Option<u64>,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Mint { user_id, username, role, hours } => {
            let _ = dotenvy::dotenv();
            let security = &config::config().security;
            let hours = hours.unwrap_or(security.jwt_expiry_hours);

            let claims = Claims::new(user_id, username, role, hours);
            let token = generate_jwt(&claims, &security.jwt_secret)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token minted",
                    Some(json!({ "token": token, "expires_at": claims.exp })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
