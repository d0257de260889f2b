use clap::{Parser, Subcommand};
use serde_json::json;

use crate::auth::{generate_jwt, Claims, Role};
use crate::config;
use crate::database::{ConnectionProvider, DatabaseManager};

#[derive(Parser)]
#[command(name = "shopctl")]
#[command(about = "Operator tooling for the shop API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a bearer token signed with the configured JWT secret")]
    Token {
        #[arg(long, help = "Username placed in the token subject")]
        username: String,
        #[arg(long, default_value = "user", help = "Role: user or admin")]
        role: String,
    },

    #[command(about = "Check database connectivity")]
    Ping,
}

#[derive(Debug, Clone, Copy)]
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
        Commands::Token { username, role } => token(&username, &role, output_format),
        Commands::Ping => ping(output_format).await,
    }
}

fn token(username: &str, role: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let role: Role = role.parse()?;
    let claims = Claims::new(username, role);
    let token = generate_jwt(&claims)?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "success": true,
                "token": token,
                "username": claims.sub,
                "role": role.as_str(),
                "expires_at": claims.exp,
            }))?
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}

async fn ping(output_format: OutputFormat) -> anyhow::Result<()> {
    let db = DatabaseManager::connect(&config::config().database).await?;
    let result = db.health_check().await;
    db.close().await;
    result?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "success": true, "database": "ok" }))?
        ),
        OutputFormat::Text => println!("Database connection ok"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_command() {
        let cli = Cli::try_parse_from([
            "shopctl", "--json", "token", "--username", "alice", "--role", "admin",
        ])
        .unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::Token { username, role } => {
                assert_eq!(username, "alice");
                assert_eq!(role, "admin");
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn role_defaults_to_user() {
        let cli = Cli::try_parse_from(["shopctl", "token", "--username", "bob"]).unwrap();
        assert!(matches!(cli.command, Commands::Token { ref role, .. } if role == "user"));
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(token("bob", "superuser", OutputFormat::Text).is_err());
    }
}
