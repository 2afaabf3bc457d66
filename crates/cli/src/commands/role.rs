//! Role management.
//!
//! # Usage
//!
//! ```bash
//! glam-cli role set --user <uuid> --role admin
//! ```
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL` - Project URL
//! - `SUPABASE_ANON_KEY` - Publishable key (validated with the rest of the
//!   project settings)
//! - `SUPABASE_SERVICE_ROLE_KEY` - Service-role key used for the writes

use secrecy::ExposeSecret;

use gemini_glam_core::roster::{RoleWrite, role_write};
use gemini_glam_core::{AppRole, UserId};
use gemini_glam_storefront::supabase::Backend;

use super::{BackendCommandError, service_client};

/// Set `user`'s role: overwrite an existing record or create one.
///
/// Follows the same rule as the admin panel. Returns which write was made.
pub async fn set(user: UserId, role: AppRole) -> Result<RoleWrite, BackendCommandError> {
    let (client, key) = service_client()?;
    let token = key.expose_secret();

    let roles = client.list_user_roles(token).await?;
    let write = role_write(&roles, user);

    match write {
        RoleWrite::Update => client.update_user_role(token, user, role).await?,
        RoleWrite::Insert => client.insert_user_role(token, user, role).await?,
    }

    tracing::info!(user_id = %user, role = %role, write = ?write, "Role set");
    Ok(write)
}
