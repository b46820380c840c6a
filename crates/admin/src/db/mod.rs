//! Database operations for the rule service `PostgreSQL`.
//!
//! # Schema: `admin`
//!
//! ## Tables
//!
//! - `discount` - Host discounts (read, `updated_at` touched on change)
//! - `discount_requirement` - Requirement instances attached to discounts
//! - `setting` - Key/value settings (JSONB), one row per configured requirement
//! - `country` - Country directory (read-only)
//! - `address` - Customer addresses (read-only)
//! - `locale_resource` - Localized UI strings
//! - `session` - Admin sessions shared with the host panel
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p discount-rules-cli -- migrate
//! ```

pub mod directory;
pub mod discounts;
pub mod locale;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use directory::DirectoryRepository;
pub use discounts::DiscountRepository;
pub use locale::LocaleRepository;
pub use settings::SettingRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., requirement for a missing discount).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the embedded admin schema migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
