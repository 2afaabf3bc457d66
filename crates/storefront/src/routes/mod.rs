//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Multi-view shell (session gate)
//! POST /navigate                      - Switch view
//! POST /notices/dismiss               - Drop queued notices
//!
//! # Quiz
//! POST /quiz/answer                   - Select an option
//! POST /quiz/reset                    - Start over
//!
//! # Designer
//! POST /designer/draft                - Store draft, re-render generate control (HTMX)
//! POST /designer/generate             - Generate a design
//!
//! # Auth
//! GET  /auth                          - Sign-in / sign-up page
//! POST /auth/sign-in                  - Sign in (rate limited)
//! POST /auth/sign-up                  - Sign up (rate limited)
//! POST /auth/sign-out                 - Sign out
//!
//! # Admin (admin gate)
//! GET  /admin                         - Panel (?tab=users|products&q=)
//! GET  /admin/users/rows              - Filtered user rows (HTMX)
//! POST /admin/users/{id}/role         - Assign role
//! GET  /admin/products/new            - Open empty product dialog
//! GET  /admin/products/{id}/edit      - Open dialog for a product
//! POST /admin/products/dialog/close   - Close dialog
//! POST /admin/products/image          - Upload product image (multipart)
//! POST /admin/products                - Save product
//! POST /admin/products/{id}/delete    - Delete product (confirmed=true)
//! ```

pub mod admin;
pub mod auth;
pub mod designer;
pub mod quiz;
pub mod shell;
pub mod showroom;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-up", post(auth::sign_up))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/", get(auth::page))
        .route("/sign-out", post(auth::sign_out))
        .merge(limited)
}

/// Create the shell routes router.
pub fn shell_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shell::show))
        .route("/navigate", post(shell::navigate))
        .route("/notices/dismiss", post(shell::dismiss_notices))
        .route("/quiz/answer", post(quiz::answer))
        .route("/quiz/reset", post(quiz::reset))
        .route("/designer/draft", post(designer::draft))
        .route("/designer/generate", post(designer::generate))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(shell_routes())
        .nest("/auth", auth_routes())
        .nest("/admin", admin::admin_routes())
}
