//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! dr-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DISCOUNT_RULES_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/admin/migrations/`

use discount_rules_admin::db;

use super::{CommandError, connect};

/// Run the service's database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
