//! In-memory [`Backend`] for router tests.
//!
//! Keeps accounts, profiles, roles, and products in plain vectors and records
//! every call so tests can assert what was (or was not) fetched.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Mutex;

use chrono::{Duration, Utc};

use gemini_glam_core::design::{DesignRequest, DesignResponse};
use gemini_glam_core::product_form::ProductDraft;
use gemini_glam_core::{
    AppRole, Email, Product, ProductId, Profile, UserId, UserRole, UserRoleId,
};

use super::{AuthSession, AuthUser, Backend, BackendError, SignUpOutcome};

struct Account {
    id: UserId,
    email: String,
    password: String,
}

#[derive(Default)]
struct Store {
    accounts: Vec<Account>,
    profiles: Vec<Profile>,
    roles: Vec<UserRole>,
    products: Vec<Product>,
    design: Option<Result<DesignResponse, String>>,
    auth_unreachable: bool,
    fail_writes: bool,
    fail_product_reads: bool,
    token_lifetime: Option<Duration>,
    calls: Vec<String>,
}

/// Hosted backend stand-in.
#[derive(Default)]
pub struct MemoryBackend {
    store: Mutex<Store>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with a profile; returns its id.
    pub fn add_user(&self, email: &str, password: &str, role: Option<AppRole>) -> UserId {
        let id = UserId::random();
        let mut store = self.store.lock().unwrap();
        store.accounts.push(Account {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
        store.profiles.insert(
            0,
            Profile {
                id,
                email: Some(email.to_string()),
                full_name: None,
                created_at: Utc::now(),
            },
        );
        if let Some(role) = role {
            store.roles.push(UserRole {
                id: UserRoleId::random(),
                user_id: id,
                role,
            });
        }
        id
    }

    pub fn add_product(&self, name: &str) -> ProductId {
        let id = ProductId::random();
        self.store.lock().unwrap().products.insert(
            0,
            Product {
                id,
                name: name.to_string(),
                description: None,
                price: rust_decimal::Decimal::new(125_000, 2),
                image_url: None,
                category: gemini_glam_core::Category::Rings,
                stock: 1,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Next design response; `Err` simulates a transport failure.
    pub fn set_design(&self, design: Result<DesignResponse, String>) {
        self.store.lock().unwrap().design = Some(design);
    }

    /// Make token refreshes fail as if the auth service were down.
    pub fn set_auth_unreachable(&self, unreachable: bool) {
        self.store.lock().unwrap().auth_unreachable = unreachable;
    }

    /// Issue sessions that expire after `lifetime` instead of an hour.
    pub fn set_token_lifetime(&self, lifetime: Duration) {
        self.store.lock().unwrap().token_lifetime = Some(lifetime);
    }

    /// Make every collection write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.store.lock().unwrap().fail_writes = fail;
    }

    /// Make product listing fail.
    pub fn set_fail_product_reads(&self, fail: bool) {
        self.store.lock().unwrap().fail_product_reads = fail;
    }

    pub fn calls(&self) -> Vec<String> {
        self.store.lock().unwrap().calls.clone()
    }

    /// Whether any recorded call starts with `prefix`.
    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    pub fn products(&self) -> Vec<Product> {
        self.store.lock().unwrap().products.clone()
    }

    pub fn role_of(&self, user: UserId) -> Option<AppRole> {
        let store = self.store.lock().unwrap();
        store.roles.iter().find(|r| r.user_id == user).map(|r| r.role)
    }

    fn record(&self, call: impl Into<String>) {
        self.store.lock().unwrap().calls.push(call.into());
    }

    fn write_guard(&self) -> Result<(), BackendError> {
        if self.store.lock().unwrap().fail_writes {
            return Err(BackendError::Status {
                status: 500,
                message: "write rejected".to_string(),
            });
        }
        Ok(())
    }

    fn session_for(id: UserId, email: &str, lifetime: Option<Duration>) -> AuthSession {
        AuthSession {
            access_token: format!("access-{}", uuid::Uuid::new_v4()),
            refresh_token: format!("refresh-{id}"),
            expires_in: lifetime.unwrap_or_else(|| Duration::hours(1)).num_seconds(),
            user: AuthUser {
                id,
                email: Some(email.to_string()),
            },
        }
    }
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthSession, BackendError> {
        self.record(format!("sign_in:{email}"));
        let store = self.store.lock().unwrap();
        store
            .accounts
            .iter()
            .find(|a| a.email == email.as_str() && a.password == password)
            .map(|a| Self::session_for(a.id, &a.email, store.token_lifetime))
            .ok_or_else(|| BackendError::Status {
                status: 400,
                message: "Invalid login credentials".to_string(),
            })
    }

    async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        _full_name: Option<&str>,
    ) -> Result<SignUpOutcome, BackendError> {
        self.record(format!("sign_up:{email}"));
        let id = self.add_user(email.as_str(), password, None);
        let lifetime = self.store.lock().unwrap().token_lifetime;
        Ok(SignUpOutcome::SignedIn(Self::session_for(id, email.as_str(), lifetime)))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        self.record("refresh_session");
        let store = self.store.lock().unwrap();
        if store.auth_unreachable {
            return Err(BackendError::Unavailable("503 Service Unavailable".to_string()));
        }
        store
            .accounts
            .iter()
            .find(|a| format!("refresh-{}", a.id) == refresh_token)
            .map(|a| Self::session_for(a.id, &a.email, store.token_lifetime))
            .ok_or_else(|| BackendError::Status {
                status: 400,
                message: "Invalid Refresh Token".to_string(),
            })
    }

    async fn sign_out(&self, _token: &str) -> Result<(), BackendError> {
        self.record("sign_out");
        Ok(())
    }

    async fn has_role(
        &self,
        _token: &str,
        user: UserId,
        role: AppRole,
    ) -> Result<bool, BackendError> {
        self.record(format!("has_role:{user}"));
        let store = self.store.lock().unwrap();
        Ok(store.roles.iter().any(|r| r.user_id == user && r.role == role))
    }

    async fn list_profiles(&self, _token: &str) -> Result<Vec<Profile>, BackendError> {
        self.record("list_profiles");
        Ok(self.store.lock().unwrap().profiles.clone())
    }

    async fn list_user_roles(&self, _token: &str) -> Result<Vec<UserRole>, BackendError> {
        self.record("list_user_roles");
        Ok(self.store.lock().unwrap().roles.clone())
    }

    async fn update_user_role(
        &self,
        _token: &str,
        user: UserId,
        role: AppRole,
    ) -> Result<(), BackendError> {
        self.record(format!("update_user_role:{user}"));
        self.write_guard()?;
        let mut store = self.store.lock().unwrap();
        for record in store.roles.iter_mut().filter(|r| r.user_id == user) {
            record.role = role;
        }
        Ok(())
    }

    async fn insert_user_role(
        &self,
        _token: &str,
        user: UserId,
        role: AppRole,
    ) -> Result<(), BackendError> {
        self.record(format!("insert_user_role:{user}"));
        self.write_guard()?;
        self.store.lock().unwrap().roles.push(UserRole {
            id: UserRoleId::random(),
            user_id: user,
            role,
        });
        Ok(())
    }

    async fn list_products(&self, _token: &str) -> Result<Vec<Product>, BackendError> {
        self.record("list_products");
        let store = self.store.lock().unwrap();
        if store.fail_product_reads {
            return Err(BackendError::Status {
                status: 500,
                message: "read rejected".to_string(),
            });
        }
        Ok(store.products.clone())
    }

    async fn insert_product(&self, _token: &str, draft: &ProductDraft) -> Result<(), BackendError> {
        self.record("insert_product");
        self.write_guard()?;
        self.store.lock().unwrap().products.insert(
            0,
            Product {
                id: ProductId::random(),
                name: draft.name.clone(),
                description: draft.description.clone(),
                price: draft.price,
                image_url: draft.image_url.clone(),
                category: draft.category,
                stock: draft.stock,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn update_product(
        &self,
        _token: &str,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<(), BackendError> {
        self.record(format!("update_product:{id}"));
        self.write_guard()?;
        let mut store = self.store.lock().unwrap();
        if let Some(product) = store.products.iter_mut().find(|p| p.id == id) {
            product.name.clone_from(&draft.name);
            product.description.clone_from(&draft.description);
            product.price = draft.price;
            product.image_url.clone_from(&draft.image_url);
            product.category = draft.category;
            product.stock = draft.stock;
        }
        Ok(())
    }

    async fn delete_product(&self, _token: &str, id: ProductId) -> Result<(), BackendError> {
        self.record(format!("delete_product:{id}"));
        self.write_guard()?;
        self.store.lock().unwrap().products.retain(|p| p.id != id);
        Ok(())
    }

    async fn upload_product_image(
        &self,
        _token: &str,
        object_name: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, BackendError> {
        self.record(format!("upload_product_image:{object_name}"));
        self.write_guard()?;
        Ok(format!(
            "https://glam-test.supabase.co/storage/v1/object/public/product-images/{object_name}"
        ))
    }

    async fn generate_design(
        &self,
        _token: &str,
        request: &DesignRequest,
    ) -> Result<DesignResponse, BackendError> {
        self.record(format!("generate_design:{}", request.prompt));
        match self.store.lock().unwrap().design.clone() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(BackendError::Unavailable(message)),
            None => Ok(DesignResponse::default()),
        }
    }
}
