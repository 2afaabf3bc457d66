//! HTTP client for the hosted backend.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use gemini_glam_core::design::{DesignRequest, DesignResponse};
use gemini_glam_core::product_form::ProductDraft;
use gemini_glam_core::{AppRole, Email, Product, ProductId, Profile, UserId, UserRole};

use crate::config::SupabaseConfig;

use super::Backend;
use super::error::{BackendError, message_from_body};
use super::types::{
    AuthSession, NewUserRole, PasswordGrant, RefreshGrant, RolePatch, SignUpBody, SignUpMetadata,
    SignUpOutcome, SignUpResponse,
};

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Client for the hosted backend's auth, rest, storage, and function APIs.
///
/// Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    http: reqwest::Client,
    base: Url,
    api_key: SecretString,
    product_bucket: String,
    design_function: String,
}

impl SupabaseClient {
    /// Create a client using the publishable (anon) key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SupabaseConfig) -> Result<Self, BackendError> {
        Self::with_api_key(config, config.anon_key.clone())
    }

    /// Create a client using a different API key, e.g. the service-role key
    /// for operator tooling.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_api_key(config: &SupabaseConfig, api_key: SecretString) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gemini-glam/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                http,
                base: config.url.clone(),
                api_key,
                product_bucket: config.product_bucket.clone(),
                design_function: config.design_function.clone(),
            }),
        })
    }

    /// The API key this client sends. Operator tooling uses the service-role
    /// key as its bearer token too.
    #[must_use]
    pub fn api_key(&self) -> &SecretString {
        &self.inner.api_key
    }

    /// Public URL of an object in the product bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the project URL cannot take path segments.
    pub fn public_image_url(&self, object_name: &str) -> Result<Url, BackendError> {
        self.endpoint(&[
            "storage",
            "v1",
            "object",
            "public",
            &self.inner.product_bucket,
            object_name,
        ])
    }

    /// Append path segments to the project URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.inner.base.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::BaseUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request acting as the signed-in user.
    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: &str,
    ) -> Result<RequestBuilder, BackendError> {
        Ok(self
            .inner
            .http
            .request(method, self.endpoint(segments)?)
            .header("apikey", self.inner.api_key.expose_secret())
            .bearer_auth(token))
    }

    /// Request to the auth service before a user token exists.
    fn public_request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, BackendError> {
        self.request(method, segments, self.inner.api_key.expose_secret())
    }

    fn rest(&self, method: Method, table: &str, token: &str) -> Result<RequestBuilder, BackendError> {
        self.request(method, &["rest", "v1", table], token)
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Parse a JSON body from a successful response.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from_response(response).await);
    }
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| BackendError::Parse(format!("Failed to parse response ({status}): {e}")))
}

/// Discard the body of a successful response.
async fn expect_success(response: Response) -> Result<(), BackendError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: Response) -> BackendError {
    let status = response.status();
    let headers = response.headers().clone();
    match response.text().await {
        Ok(body) => error_from_parts(status, &headers, &body),
        Err(e) => BackendError::Http(e),
    }
}

fn error_from_parts(status: StatusCode, headers: &HeaderMap, body: &str) -> BackendError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited(
            headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        ),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            BackendError::Unavailable(status.to_string())
        }
        StatusCode::UNAUTHORIZED => BackendError::Unauthorized(message_from_body(body)),
        _ => BackendError::Status {
            status: status.as_u16(),
            message: message_from_body(body),
        },
    }
}

/// Interpret a function response.
///
/// Only a 2xx body is a design response; its `error` field is the service's
/// own message. Any other status is a rejected call, whatever the body says.
fn design_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> Result<DesignResponse, BackendError> {
    if !status.is_success() {
        return Err(error_from_parts(status, headers, body));
    }
    serde_json::from_str(body)
        .map_err(|e| BackendError::Parse(format!("Failed to parse design response: {e}")))
}

// =============================================================================
// Backend Implementation
// =============================================================================

#[async_trait::async_trait]
impl Backend for SupabaseClient {
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthSession, BackendError> {
        let response = self
            .public_request(Method::POST, &["auth", "v1", "token"])?
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant {
                email: email.as_str(),
                password,
            })
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SignUpOutcome, BackendError> {
        let response = self
            .public_request(Method::POST, &["auth", "v1", "signup"])?
            .json(&SignUpBody {
                email: email.as_str(),
                password,
                data: SignUpMetadata { full_name },
            })
            .send()
            .await?;
        let parsed: SignUpResponse = read_json(response).await?;
        Ok(parsed.into())
    }

    #[instrument(skip_all)]
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        let response = self
            .public_request(Method::POST, &["auth", "v1", "token"])?
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant { refresh_token })
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, token: &str) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, &["auth", "v1", "logout"], token)?
            .send()
            .await?;
        expect_success(response).await
    }

    #[instrument(skip(self, token))]
    async fn has_role(
        &self,
        token: &str,
        user: UserId,
        role: AppRole,
    ) -> Result<bool, BackendError> {
        let response = self
            .rest(Method::GET, "user_roles", token)?
            .query(&[
                ("select", "id".to_string()),
                ("user_id", format!("eq.{user}")),
                ("role", format!("eq.{role}")),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = read_json(response).await?;
        Ok(!rows.is_empty())
    }

    #[instrument(skip_all)]
    async fn list_profiles(&self, token: &str) -> Result<Vec<Profile>, BackendError> {
        let response = self
            .rest(Method::GET, "profiles", token)?
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(skip_all)]
    async fn list_user_roles(&self, token: &str) -> Result<Vec<UserRole>, BackendError> {
        let response = self
            .rest(Method::GET, "user_roles", token)?
            .query(&[("select", "*")])
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(skip(self, token))]
    async fn update_user_role(
        &self,
        token: &str,
        user: UserId,
        role: AppRole,
    ) -> Result<(), BackendError> {
        let response = self
            .rest(Method::PATCH, "user_roles", token)?
            .query(&[("user_id", format!("eq.{user}"))])
            .header("Prefer", "return=minimal")
            .json(&RolePatch { role })
            .send()
            .await?;
        expect_success(response).await
    }

    #[instrument(skip(self, token))]
    async fn insert_user_role(
        &self,
        token: &str,
        user: UserId,
        role: AppRole,
    ) -> Result<(), BackendError> {
        let response = self
            .rest(Method::POST, "user_roles", token)?
            .header("Prefer", "return=minimal")
            .json(&[NewUserRole {
                user_id: user,
                role,
            }])
            .send()
            .await?;
        expect_success(response).await
    }

    #[instrument(skip_all)]
    async fn list_products(&self, token: &str) -> Result<Vec<Product>, BackendError> {
        let response = self
            .rest(Method::GET, "products", token)?
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(skip(self, token, draft), fields(name = %draft.name))]
    async fn insert_product(&self, token: &str, draft: &ProductDraft) -> Result<(), BackendError> {
        let response = self
            .rest(Method::POST, "products", token)?
            .header("Prefer", "return=minimal")
            .json(&[draft])
            .send()
            .await?;
        expect_success(response).await
    }

    #[instrument(skip(self, token, draft))]
    async fn update_product(
        &self,
        token: &str,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<(), BackendError> {
        let response = self
            .rest(Method::PATCH, "products", token)?
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(draft)
            .send()
            .await?;
        expect_success(response).await
    }

    #[instrument(skip(self, token))]
    async fn delete_product(&self, token: &str, id: ProductId) -> Result<(), BackendError> {
        let response = self
            .rest(Method::DELETE, "products", token)?
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        expect_success(response).await
    }

    #[instrument(skip(self, token, bytes), fields(size = bytes.len()))]
    async fn upload_product_image(
        &self,
        token: &str,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BackendError> {
        let response = self
            .request(
                Method::POST,
                &[
                    "storage",
                    "v1",
                    "object",
                    &self.inner.product_bucket,
                    object_name,
                ],
                token,
            )?
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        expect_success(response).await?;

        Ok(self.public_image_url(object_name)?.to_string())
    }

    #[instrument(skip(self, token, request), fields(function = %self.inner.design_function))]
    async fn generate_design(
        &self,
        token: &str,
        request: &DesignRequest,
    ) -> Result<DesignResponse, BackendError> {
        let response = self
            .request(
                Method::POST,
                &["functions", "v1", &self.inner.design_function],
                token,
            )?
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        design_from_parts(status, &headers, &body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(url: &str) -> SupabaseClient {
        let config = SupabaseConfig {
            url: Url::parse(url).unwrap(),
            anon_key: SecretString::from("anon"),
            product_bucket: "product-images".to_string(),
            design_function: "generate-jewelry-design".to_string(),
        };
        SupabaseClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = client("https://glam.supabase.co");
        let url = client.endpoint(&["rest", "v1", "products"]).unwrap();
        assert_eq!(url.as_str(), "https://glam.supabase.co/rest/v1/products");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://proxy.glam.test/supabase/");
        let url = client.endpoint(&["auth", "v1", "token"]).unwrap();
        assert_eq!(url.as_str(), "https://proxy.glam.test/supabase/auth/v1/token");
    }

    #[test]
    fn test_public_image_url() {
        let client = client("https://glam.supabase.co");
        assert_eq!(
            client.public_image_url("abc.png").unwrap().as_str(),
            "https://glam.supabase.co/storage/v1/object/public/product-images/abc.png"
        );
    }

    #[test]
    fn test_public_image_url_escapes_name() {
        let client = client("https://glam.supabase.co");
        let url = client.public_image_url("a b/c.png").unwrap();
        assert!(url.as_str().ends_with("/product-images/a%20b%2Fc.png"));
    }

    #[test]
    fn test_error_from_parts_maps_statuses() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "12".parse().unwrap());
        assert!(matches!(
            error_from_parts(StatusCode::TOO_MANY_REQUESTS, &headers, ""),
            BackendError::RateLimited(12)
        ));

        let empty = HeaderMap::new();
        assert!(error_from_parts(StatusCode::BAD_GATEWAY, &empty, "").is_unreachable());
        assert!(matches!(
            error_from_parts(StatusCode::UNAUTHORIZED, &empty, r#"{"message":"JWT expired"}"#),
            BackendError::Unauthorized(m) if m == "JWT expired"
        ));
        assert!(matches!(
            error_from_parts(StatusCode::BAD_REQUEST, &empty, r#"{"error_description":"Invalid login credentials"}"#),
            BackendError::Status { status: 400, message } if message == "Invalid login credentials"
        ));
    }

    #[test]
    fn test_design_error_body_on_failure_status_is_rejected_call() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "30".parse().unwrap());
        let result = design_from_parts(
            StatusCode::TOO_MANY_REQUESTS,
            &headers,
            r#"{"error":"Rate limits exceeded, please try again later."}"#,
        );
        assert!(matches!(result, Err(BackendError::RateLimited(30))));

        let result = design_from_parts(
            StatusCode::PAYMENT_REQUIRED,
            &HeaderMap::new(),
            r#"{"error":"Payment required, please add funds."}"#,
        );
        assert!(matches!(result, Err(BackendError::Status { status: 402, .. })));
    }

    #[test]
    fn test_design_error_body_on_success_is_service_message() {
        let response = design_from_parts(
            StatusCode::OK,
            &HeaderMap::new(),
            r#"{"error":"Prompt was flagged."}"#,
        )
        .unwrap();
        assert_eq!(response.error.as_deref(), Some("Prompt was flagged."));
    }

    #[test]
    fn test_design_failure_without_error_body_is_err() {
        let result = design_from_parts(StatusCode::INTERNAL_SERVER_ERROR, &HeaderMap::new(), "boom");
        assert!(matches!(result, Err(BackendError::Status { status: 500, .. })));
    }

    #[test]
    fn test_design_malformed_success_body_is_parse_error() {
        let result = design_from_parts(StatusCode::OK, &HeaderMap::new(), "<html>");
        assert!(matches!(result, Err(BackendError::Parse(_))));
    }
}
