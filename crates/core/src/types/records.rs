//! Records owned by the hosted store.
//!
//! These mirror the rows returned by the remote collections. The
//! storefront holds transient copies for rendering and editing only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AppRole, Category, ProductId, UserId, UserRoleId, format_usd};

/// A catalog product (`products` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: Category,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Price formatted for tables, e.g. `$2450.00`.
    #[must_use]
    pub fn display_price(&self) -> String {
        format_usd(self.price)
    }
}

/// A user profile (`profiles` collection), mirroring the identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A role assignment (`user_roles` collection). At most one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: UserRoleId,
    pub user_id: UserId,
    pub role: AppRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_numeric_price_and_nulls() {
        let json = r#"{
            "id": "2f0c1c5e-3a4f-4b9e-9d1a-8a7b6c5d4e3f",
            "name": "Aurora Ring",
            "description": null,
            "price": 1890.5,
            "image_url": null,
            "category": "rings",
            "stock": 3,
            "created_at": "2025-01-02T03:04:05+00:00"
        }"#;

        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.category, Category::Rings);
        assert_eq!(product.description, None);
        assert_eq!(product.display_price(), "$1890.50");
    }

    #[test]
    fn test_profile_allows_missing_optional_fields() {
        let json = r#"{
            "id": "7d3b0a52-90a1-4c8e-8f3e-0e1f2a3b4c5d",
            "created_at": "2025-01-02T03:04:05Z"
        }"#;

        let profile: Profile = serde_json::from_str(json).expect("deserialize");
        assert!(profile.email.is_none());
        assert!(profile.full_name.is_none());
    }
}
