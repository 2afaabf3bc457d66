//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID
//! 4. Security headers (CSP, frame, isolation)
//! 5. Session layer (tower-sessions)
//! 6. Rate limiting on sign-in/sign-up (governor)
//!
//! Gates are extractors ([`SignedIn`], [`AdminUser`]) rather than layers, so
//! each handler states what it needs.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AdminUser, GateRejection, SignedIn, clear_current_user, resolve_session, sign_in_user,
};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, session_layer};
