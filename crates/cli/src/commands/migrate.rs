//! Session store migration.
//!
//! # Usage
//!
//! ```bash
//! glam-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `GLAM_SESSION_DATABASE_URL` - `PostgreSQL` connection string for the
//!   session store (falls back to `DATABASE_URL`)

use sqlx::PgPool;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0} (or DATABASE_URL)")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

const PRIMARY_URL_VAR: &str = "GLAM_SESSION_DATABASE_URL";
const FALLBACK_URL_VAR: &str = "DATABASE_URL";

/// Create the `tower_sessions` schema and session table.
///
/// Safe to run repeatedly.
pub async fn sessions() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url(|key| std::env::var(key).ok())?;

    tracing::info!("Connecting to session database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Session store migration complete!");
    Ok(())
}

fn database_url(lookup: impl Fn(&str) -> Option<String>) -> Result<String, MigrationError> {
    lookup(PRIMARY_URL_VAR)
        .or_else(|| lookup(FALLBACK_URL_VAR))
        .filter(|url| !url.trim().is_empty())
        .ok_or(MigrationError::MissingEnvVar(PRIMARY_URL_VAR))
}
