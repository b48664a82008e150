use clap::{Parser, Subcommand};
use serde_json::json;

use crate::auth::create_token;
use crate::database::SCHEMA_SQL;
use crate::server;

#[derive(Parser, Debug)]
#[command(name = "jobly")]
#[command(about = "Jobly CLI - run the API and manage local credentials")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, short, help = "Port to listen on (defaults to PORT or 3001)")]
        port: Option<u16>,
    },

    #[command(about = "Print a signed token for local use")]
    Token {
        username: String,

        #[arg(long, help = "Grant admin rights")]
        admin: bool,
    },

    #[command(about = "Print the SQL schema")]
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq)]
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
        Commands::Serve { port } => server::run(port).await,
        Commands::Token { username, admin } => {
            let token = create_token(&username, admin)?;
            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "username": username, "isAdmin": admin, "token": token }))?
                ),
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
        Commands::Schema => {
            print!("{}", SCHEMA_SQL);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_port() {
        let cli = Cli::try_parse_from(["jobly", "serve", "--port", "4000"]).unwrap();
        assert_eq!(cli.command, Commands::Serve { port: Some(4000) });
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }

    #[test]
    fn parses_admin_token() {
        let cli = Cli::try_parse_from(["jobly", "--json", "token", "u1", "--admin"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Token {
                username: "u1".into(),
                admin: true
            }
        );
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
    }

    #[test]
    fn token_requires_username() {
        assert!(Cli::try_parse_from(["jobly", "token"]).is_err());
    }

    #[test]
    fn schema_declares_both_tables() {
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS companies"));
        assert!(SCHEMA_SQL.contains("REFERENCES companies ON DELETE CASCADE"));
    }
}
