//! CLI subcommands.

pub mod migrate;
pub mod products;
pub mod role;

use secrecy::SecretString;

use gemini_glam_storefront::config::{ConfigError, SupabaseConfig};
use gemini_glam_storefront::supabase::{BackendError, SupabaseClient};

/// Environment variable holding the service-role key.
pub const SERVICE_ROLE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Errors from commands that talk to the hosted backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendCommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A client acting with the service-role key, bypassing row-level security.
///
/// The key doubles as the bearer token for collection calls.
pub(crate) fn service_client() -> Result<(SupabaseClient, SecretString), BackendCommandError> {
    dotenvy::dotenv().ok();

    let config = SupabaseConfig::from_env()?;
    let key = std::env::var(SERVICE_ROLE_KEY_VAR)
        .map(SecretString::from)
        .map_err(|_| BackendCommandError::MissingEnvVar(SERVICE_ROLE_KEY_VAR))?;

    tracing::info!("Using project {}", config.origin());
    let client = SupabaseClient::with_api_key(&config, key.clone())?;
    Ok((client, key))
}
