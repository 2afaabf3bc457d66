//! Product dialog form state and parsing.
//!
//! The dialog keeps raw strings so a half-filled form survives between the
//! separate upload and save requests. Only price and stock are checked here;
//! everything else is left to the remote store.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::types::{Category, Product, ProductId};

/// Errors from [`ProductForm::parse`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductFormError {
    #[error("price is not a number: {0:?}")]
    InvalidPrice(String),
    #[error("stock is not a whole number: {0:?}")]
    InvalidStock(String),
}

/// Raw dialog values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    /// Record being edited; `None` while adding.
    pub editing: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: Category,
    pub stock: String,
    /// Public locator of the uploaded image, empty when none.
    pub image_url: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            editing: None,
            name: String::new(),
            description: String::new(),
            price: String::new(),
            category: Category::default(),
            stock: "0".to_owned(),
            image_url: String::new(),
        }
    }
}

impl ProductForm {
    /// Prefill the dialog from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            editing: Some(product.id),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.normalize().to_string(),
            category: product.category,
            stock: product.stock.to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }

    /// Dialog title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Product"
        } else {
            "Add New Product"
        }
    }

    /// Submit button label.
    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Update Product"
        } else {
            "Add Product"
        }
    }

    /// Copy the text fields from a submitted form, keeping `editing` and the
    /// uploaded image locator.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.category = fields.category;
        self.stock = fields.stock;
    }

    /// Parse into the record payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is not a finite float or the stock is
    /// not an integer.
    pub fn parse(&self) -> Result<ProductDraft, ProductFormError> {
        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Decimal::from_f64)
            .ok_or_else(|| ProductFormError::InvalidPrice(self.price.clone()))?;
        let stock = self
            .stock
            .trim()
            .parse::<i64>()
            .map_err(|_| ProductFormError::InvalidStock(self.stock.clone()))?;

        Ok(ProductDraft {
            name: self.name.clone(),
            description: non_empty(&self.description),
            price,
            category: self.category,
            stock,
            image_url: non_empty(&self.image_url),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

/// Editable text fields as posted by the dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductFields {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    pub category: Category,
    pub stock: String,
}

/// Insert/update payload for the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: Category,
    pub stock: i64,
    pub image_url: Option<String>,
}

/// Random object name for an upload, keeping the original extension.
///
/// The extension is whatever follows the last `.`; a name without one is
/// used whole.
#[must_use]
pub fn image_object_name(original: &str) -> String {
    let extension = original.rsplit('.').next().unwrap_or(original);
    format!("{}.{extension}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn filled() -> ProductForm {
        ProductForm {
            name: "Aurora Ring".to_owned(),
            price: " 1890.50 ".to_owned(),
            stock: "4".to_owned(),
            category: Category::Rings,
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_default_form_matches_empty_dialog() {
        let form = ProductForm::default();
        assert_eq!(form.category, Category::Necklaces);
        assert_eq!(form.stock, "0");
        assert_eq!(form.title(), "Add New Product");
    }

    #[test]
    fn test_parse_blank_optionals_become_null() {
        let draft = filled().parse().expect("valid form");
        assert_eq!(draft.price, Decimal::new(189_050, 2));
        assert_eq!(draft.stock, 4);
        assert_eq!(draft.description, None);
        assert_eq!(draft.image_url, None);

        let json = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(json["price"], serde_json::json!(1890.5));
        assert_eq!(json["category"], "rings");
        assert!(json["image_url"].is_null());
    }

    #[test]
    fn test_parse_rejects_bad_price() {
        let form = ProductForm {
            price: "lots".to_owned(),
            ..filled()
        };
        assert_eq!(
            form.parse(),
            Err(ProductFormError::InvalidPrice("lots".to_owned()))
        );

        let form = ProductForm {
            price: "NaN".to_owned(),
            ..filled()
        };
        assert!(matches!(form.parse(), Err(ProductFormError::InvalidPrice(_))));
    }

    #[test]
    fn test_parse_rejects_fractional_stock() {
        let form = ProductForm {
            stock: "2.5".to_owned(),
            ..filled()
        };
        assert_eq!(
            form.parse(),
            Err(ProductFormError::InvalidStock("2.5".to_owned()))
        );
    }

    #[test]
    fn test_negative_stock_is_left_to_the_store() {
        let form = ProductForm {
            stock: "-1".to_owned(),
            ..filled()
        };
        assert_eq!(form.parse().map(|d| d.stock), Ok(-1));
    }

    #[test]
    fn test_from_product_prefills_and_marks_editing() {
        let product = Product {
            id: ProductId::random(),
            name: "Eternal Grace".to_owned(),
            description: Some("Braided gold".to_owned()),
            price: Decimal::new(210_000, 2),
            image_url: None,
            category: Category::Bracelets,
            stock: 2,
            created_at: Utc::now(),
        };

        let form = ProductForm::from_product(&product);
        assert_eq!(form.editing, Some(product.id));
        assert_eq!(form.price, "2100");
        assert_eq!(form.image_url, "");
        assert_eq!(form.title(), "Edit Product");
        assert_eq!(form.submit_label(), "Update Product");
    }

    #[test]
    fn test_apply_keeps_editing_and_image() {
        let id = ProductId::random();
        let mut form = ProductForm {
            editing: Some(id),
            image_url: "https://cdn.test/a.png".to_owned(),
            ..ProductForm::default()
        };
        form.apply(ProductFields {
            name: "Midnight Bloom".to_owned(),
            description: String::new(),
            price: "2450".to_owned(),
            category: Category::Necklaces,
            stock: "1".to_owned(),
        });

        assert_eq!(form.editing, Some(id));
        assert_eq!(form.image_url, "https://cdn.test/a.png");
        assert_eq!(form.name, "Midnight Bloom");
    }

    #[test]
    fn test_image_object_name_keeps_extension() {
        let name = image_object_name("bloom.final.PNG");
        assert!(name.ends_with(".PNG"));
        assert_ne!(name, image_object_name("bloom.final.PNG"));

        let (stem, _) = name.split_once('.').expect("has a dot");
        assert!(uuid::Uuid::parse_str(stem).is_ok());
    }
}
