//! Black-box tests for a running Gemini Glam storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront against a Supabase project
//! cargo run -p gemini-glam-storefront
//!
//! # Run the ignored tests
//! GLAM_TEST_EMAIL=... GLAM_TEST_PASSWORD=... \
//! GLAM_TEST_ADMIN_EMAIL=... GLAM_TEST_ADMIN_PASSWORD=... \
//!     cargo test -p gemini-glam-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `GLAM_TEST_BASE_URL` - Storefront URL (default: `http://localhost:3000`)
//! - `GLAM_TEST_EMAIL` / `GLAM_TEST_PASSWORD` - A confirmed account with
//!   the `user` role
//! - `GLAM_TEST_ADMIN_EMAIL` / `GLAM_TEST_ADMIN_PASSWORD` - A confirmed
//!   account with the `admin` role (see `glam-cli role set`)

use reqwest::{Client, StatusCode, redirect};

/// Base URL of the storefront under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("GLAM_TEST_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A client that keeps cookies and does not follow redirects, so tests
/// can assert on them.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Which test account to sign in as.
#[derive(Debug, Clone, Copy)]
pub enum Account {
    User,
    Admin,
}

impl Account {
    fn credentials(self) -> (String, String) {
        let (email_var, password_var) = match self {
            Self::User => ("GLAM_TEST_EMAIL", "GLAM_TEST_PASSWORD"),
            Self::Admin => ("GLAM_TEST_ADMIN_EMAIL", "GLAM_TEST_ADMIN_PASSWORD"),
        };
        let read = |var: &str| std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set"));
        (read(email_var), read(password_var))
    }
}

/// Sign in and return the client holding the session cookie.
///
/// # Panics
///
/// Panics if credentials are missing or the sign-in does not land on the
/// shell.
pub async fn signed_in(account: Account) -> Client {
    let (email, password) = account.credentials();
    let client = client();
    let resp = client
        .post(format!("{}/auth/sign-in", base_url()))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to sign in");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/", "sign-in should land on the shell");
    client
}

/// The `Location` header of a redirect, or an empty string.
#[must_use]
pub fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// GET a page and return its body, asserting a 200.
///
/// # Panics
///
/// Panics on transport errors or a non-200 status.
pub async fn page(client: &Client, path: &str) -> String {
    let resp = client
        .get(format!("{}{path}", base_url()))
        .send()
        .await
        .unwrap_or_else(|e| panic!("GET {path} failed: {e}"));
    assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
    resp.text().await.expect("Failed to read response")
}

/// POST a form, returning the raw response.
///
/// # Panics
///
/// Panics on transport errors.
pub async fn post(client: &Client, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
    client
        .post(format!("{}{path}", base_url()))
        .form(form)
        .send()
        .await
        .unwrap_or_else(|e| panic!("POST {path} failed: {e}"))
}
