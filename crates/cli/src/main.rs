//! Discount rules CLI - database migrations and rule lifecycle tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! dr-cli migrate
//!
//! # Register the rule's locale resources
//! dr-cli plugin install
//!
//! # Remove the rule's requirements, settings and locale resources
//! dr-cli plugin uninstall
//!
//! # Evaluate a requirement for a customer shipping to an address
//! dr-cli evaluate --requirement 7 --address 100
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dr-cli")]
#[command(author, version, about = "Discount rules CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Run rule lifecycle hooks
    Plugin {
        #[command(subcommand)]
        action: PluginAction,
    },
    /// Evaluate a requirement for an ad-hoc customer
    Evaluate {
        /// Discount requirement ID
        #[arg(short, long)]
        requirement: i32,

        /// Shipping address ID of the customer (omit for a customer without one)
        #[arg(short, long)]
        address: Option<i32>,
    },
}

#[derive(Subcommand)]
enum PluginAction {
    /// Register locale resources
    Install,
    /// Delete requirements, their settings and locale resources
    Uninstall,
}

/// Log filter when `RUST_LOG` is unset; command outcomes are logged at info.
const DEFAULT_LOG_FILTER: &str = "dr_cli=info,discount_rules_admin=info";

fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() {
    // Commands read their options from the environment, .env included
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Plugin { action } => match action {
            PluginAction::Install => commands::plugin::install().await?,
            PluginAction::Uninstall => commands::plugin::uninstall().await?,
        },
        Commands::Evaluate {
            requirement,
            address,
        } => {
            commands::evaluate::run(requirement, address).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn test_cli_parses_evaluate_arguments() {
        let cli = Cli::try_parse_from(["dr-cli", "evaluate", "--requirement", "7", "--address", "100"])
            .expect("valid arguments");
        assert!(matches!(
            cli.command,
            Commands::Evaluate {
                requirement: 7,
                address: Some(100)
            }
        ));
    }
}
