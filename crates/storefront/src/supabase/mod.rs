//! Hosted backend access: auth, collections, storage, and functions.
//!
//! # Architecture
//!
//! - The hosted project is the source of truth. Nothing is cached locally;
//!   every screen reads through these calls and refetches after writes.
//! - Row-level security runs as the signed-in user: collection, storage,
//!   and function calls carry the visitor's access token as the bearer.
//! - Handlers talk to the [`Backend`] trait so router tests can swap in an
//!   in-memory implementation.
//!
//! # Services
//!
//! | Service | Path |
//! |---|---|
//! | Auth | `/auth/v1/token`, `/auth/v1/signup`, `/auth/v1/logout` |
//! | Collections | `/rest/v1/{products,profiles,user_roles}` |
//! | Storage | `/storage/v1/object/<bucket>/<name>` |
//! | Functions | `/functions/v1/<name>` |

mod client;
mod error;
#[cfg(test)]
pub(crate) mod memory;
mod types;

pub use client::SupabaseClient;
pub use error::{BackendError, ErrorBody};
pub use types::{AuthSession, AuthUser, SignUpOutcome};

use gemini_glam_core::design::{DesignRequest, DesignResponse};
use gemini_glam_core::product_form::ProductDraft;
use gemini_glam_core::{AppRole, Email, Product, ProductId, Profile, UserId, UserRole};

/// Everything the storefront asks of the hosted backend.
///
/// `token` parameters are the signed-in visitor's access token.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    // -- auth -----------------------------------------------------------------

    /// Exchange email and password for a session.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthSession, BackendError>;

    /// Register a new account.
    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SignUpOutcome, BackendError>;

    /// Trade a refresh token for a fresh session.
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError>;

    /// Revoke the session server-side.
    async fn sign_out(&self, token: &str) -> Result<(), BackendError>;

    // -- roles ----------------------------------------------------------------

    /// Whether `user` holds `role`.
    async fn has_role(&self, token: &str, user: UserId, role: AppRole)
    -> Result<bool, BackendError>;

    /// All profiles, newest first.
    async fn list_profiles(&self, token: &str) -> Result<Vec<Profile>, BackendError>;

    /// All role records.
    async fn list_user_roles(&self, token: &str) -> Result<Vec<UserRole>, BackendError>;

    /// Overwrite the role on `user`'s existing record.
    async fn update_user_role(
        &self,
        token: &str,
        user: UserId,
        role: AppRole,
    ) -> Result<(), BackendError>;

    /// Create a role record for `user`.
    async fn insert_user_role(
        &self,
        token: &str,
        user: UserId,
        role: AppRole,
    ) -> Result<(), BackendError>;

    // -- products -------------------------------------------------------------

    /// All products, newest first.
    async fn list_products(&self, token: &str) -> Result<Vec<Product>, BackendError>;

    async fn insert_product(&self, token: &str, draft: &ProductDraft) -> Result<(), BackendError>;

    async fn update_product(
        &self,
        token: &str,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<(), BackendError>;

    async fn delete_product(&self, token: &str, id: ProductId) -> Result<(), BackendError>;

    /// Store an image in the product bucket and return its public URL.
    async fn upload_product_image(
        &self,
        token: &str,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BackendError>;

    // -- functions ------------------------------------------------------------

    /// Invoke the design generation function.
    ///
    /// A service-reported problem comes back as `Ok` with `error` set; only
    /// transport and protocol failures are `Err`.
    async fn generate_design(
        &self,
        token: &str,
        request: &DesignRequest,
    ) -> Result<DesignResponse, BackendError>;
}
