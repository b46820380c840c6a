//! CLI command implementations.

pub mod evaluate;
pub mod migrate;
pub mod plugin;

use sqlx::PgPool;
use thiserror::Error;

use discount_rules_admin::{
    config::{self, ConfigError},
    db,
    rules::RuleError,
};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A rule hook or evaluation failed.
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Invalid command argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Connect to the database named by the environment.
async fn connect() -> Result<PgPool, CommandError> {
    let database_url = config::database_url_from_env()?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
