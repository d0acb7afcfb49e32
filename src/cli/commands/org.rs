use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum OrgCommands {
    #[command(about = "List organizations")]
    List,

    #[command(about = "Show an organization and its members")]
    Show {
        #[arg(help = "Organization ID")]
        org_id: i32,
    },

    #[command(about = "Delete an organization, release its domain and free member usernames")]
    Delete {
        #[arg(help = "Organization ID")]
        org_id: i32,

        #[arg(long, help = "Confirm the deletion")]
        yes: bool,
    },
}

pub async fn handle(cmd: OrgCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        OrgCommands::List => {
            let data = client.get("/api/root/organization").await?;
            let organizations = data.as_array().cloned().unwrap_or_default();

            if organizations.is_empty() {
                return output_empty_collection(&output_format, "organizations", "No organizations found");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "organizations": organizations }))?);
                }
                OutputFormat::Text => {
                    println!("{:<8} {:<30} {:<20} {}", "ID", "NAME", "SLUG", "MEMBERS");
                    println!("{}", "-".repeat(70));
                    for org in &organizations {
                        println!(
                            "{:<8} {:<30} {:<20} {}",
                            org["id"],
                            display_str(&org["name"]),
                            display_str(&org["slug"]),
                            org["memberCount"]
                        );
                    }
                }
            }
            Ok(())
        }
        OrgCommands::Show { org_id } => {
            let data = client.get(&format!("/api/root/organization/{}", org_id)).await?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
                OutputFormat::Text => {
                    let team = &data["team"];
                    println!("Organization: {} ({})", display_str(&team["name"]), team["id"]);
                    println!("Slug: {}", display_str(&team["slug"]));
                    println!();
                    println!("{:<8} {:<25} {:<30} {}", "USER", "USERNAME", "EMAIL", "ROLE");
                    for member in data["members"].as_array().into_iter().flatten() {
                        let user = &member["user"];
                        println!(
                            "{:<8} {:<25} {:<30} {}",
                            user["id"],
                            display_str(&user["username"]),
                            display_str(&user["email"]),
                            display_str(&member["membership"]["role"])
                        );
                    }
                }
            }
            Ok(())
        }
        OrgCommands::Delete { org_id, yes } => {
            if !yes {
                anyhow::bail!(
                    "Deleting organization {} releases its domain and renames every member; re-run with --yes to confirm",
                    org_id
                );
            }

            let data = client
                .post("/api/root/organization/delete", json!({ "orgId": org_id }))
                .await?;
            let message = data["message"].as_str().unwrap_or("Organization deleted.");
            output_success(&output_format, message, Some(json!({ "orgId": org_id })))
        }
    }
}
