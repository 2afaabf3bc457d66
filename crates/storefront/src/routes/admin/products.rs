//! Product inventory CRUD.
//!
//! The dialog's values live in the session as a [`ProductForm`], so an
//! image upload and the final save can be separate requests. Every
//! mutation redirects to the products tab, which refetches the list.

use axum::{
    Form,
    extract::{Multipart, Path, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use gemini_glam_core::product_form::{ProductFields, ProductForm, image_object_name};
use gemini_glam_core::{Category, Product, ProductId};

use crate::error::{AppError, Result};
use crate::htmx;
use crate::middleware::AdminUser;
use crate::models::session::{
    close_product_form, load_product_form, push_notice, save_product_form,
};
use crate::models::{CurrentUser, Notice};
use crate::state::AppState;

const PRODUCTS_TAB: &str = "/admin?tab=products";

/// Largest accepted upload body.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

// =============================================================================
// View Models
// =============================================================================

/// A product table row.
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category: &'static str,
    pub price: String,
    pub stock: i64,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.as_str(),
            price: product.display_price(),
            stock: product.stock,
            image_url: product.image_url.clone().filter(|url| !url.is_empty()),
        }
    }
}

/// An option in the category select.
pub struct CategoryChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// The open product dialog.
pub struct ProductDialog {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub image_url: String,
    pub categories: Vec<CategoryChoice>,
}

impl From<&ProductForm> for ProductDialog {
    fn from(form: &ProductForm) -> Self {
        Self {
            title: form.title(),
            submit_label: form.submit_label(),
            name: form.name.clone(),
            description: form.description.clone(),
            price: form.price.clone(),
            stock: form.stock.clone(),
            image_url: form.image_url.clone(),
            categories: Category::ALL
                .iter()
                .map(|&category| CategoryChoice {
                    value: category.as_str(),
                    label: category.label(),
                    selected: category == form.category,
                })
                .collect(),
        }
    }
}

/// Fetch the inventory for the products tab, reporting failure as a notice.
pub(super) async fn fetch_rows(
    state: &AppState,
    user: &CurrentUser,
    session: &Session,
) -> Result<Vec<ProductRow>> {
    match state.backend().list_products(&user.access_token).await {
        Ok(products) => Ok(products.iter().map(ProductRow::from).collect()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load products");
            push_notice(session, Notice::error("Error", "Failed to load products.")).await?;
            Ok(Vec::new())
        }
    }
}

// =============================================================================
// Dialog
// =============================================================================

/// Open an empty dialog.
#[instrument(skip_all)]
pub async fn open_new(
    AdminUser(_user): AdminUser,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    save_product_form(&session, &ProductForm::default()).await?;
    Ok(htmx::redirect(&headers, PRODUCTS_TAB))
}

/// Open the dialog prefilled from an existing product.
#[instrument(skip_all)]
pub async fn open_edit(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<ProductId>,
) -> Result<Response> {
    match state.backend().list_products(&user.access_token).await {
        Ok(products) => match products.iter().find(|p| p.id == id) {
            Some(product) => {
                save_product_form(&session, &ProductForm::from_product(product)).await?;
            }
            None => {
                tracing::warn!(product_id = %id, "Product to edit not found");
                push_notice(&session, Notice::error("Error", "Product not found.")).await?;
            }
        },
        Err(e) => {
            tracing::error!(error = %e, product_id = %id, "Failed to load product for editing");
            push_notice(&session, Notice::error("Error", "Failed to load product.")).await?;
        }
    }

    Ok(htmx::redirect(&headers, PRODUCTS_TAB))
}

/// Close the dialog and reset its values.
#[instrument(skip_all)]
pub async fn close(
    AdminUser(_user): AdminUser,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    close_product_form(&session).await?;
    Ok(htmx::redirect(&headers, PRODUCTS_TAB))
}

// =============================================================================
// Image Upload
// =============================================================================

/// Image file pulled from the upload form.
struct UploadedImage {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Upload an image to the product bucket and keep its locator on the form.
///
/// The dialog's other fields ride along so nothing typed so far is lost.
#[instrument(skip_all)]
pub async fn upload_image(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    session: Session,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut form = load_product_form(&session).await?.unwrap_or_default();
    let mut text = TextFields::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !file_name.is_empty() && !bytes.is_empty() {
                image = Some(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            text.set(&name, value);
        }
    }

    text.apply_to(&mut form);

    if let Some(image) = image {
        let object_name = image_object_name(&image.file_name);
        let uploaded = state
            .backend()
            .upload_product_image(
                &user.access_token,
                &object_name,
                &image.content_type,
                image.bytes,
            )
            .await;

        let notice = match uploaded {
            Ok(url) => {
                tracing::info!(object = %object_name, "Product image uploaded");
                form.image_url = url;
                Notice::success("Success", "Image uploaded successfully.")
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to upload image");
                Notice::error("Error", "Failed to upload image.")
            }
        };
        push_notice(&session, notice).await?;
    }

    save_product_form(&session, &form).await?;
    Ok(htmx::redirect(&headers, PRODUCTS_TAB))
}

/// Dialog text fields found in a multipart body.
#[derive(Default)]
struct TextFields {
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    category: Option<String>,
    stock: Option<String>,
}

impl TextFields {
    fn set(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = Some(value),
            "description" => self.description = Some(value),
            "price" => self.price = Some(value),
            "category" => self.category = Some(value),
            "stock" => self.stock = Some(value),
            _ => {}
        }
    }

    /// Overwrite whatever was posted; absent fields keep the stored value.
    fn apply_to(self, form: &mut ProductForm) {
        let fields = ProductFields {
            name: self.name.unwrap_or_else(|| form.name.clone()),
            description: self.description.unwrap_or_else(|| form.description.clone()),
            price: self.price.unwrap_or_else(|| form.price.clone()),
            category: self
                .category
                .and_then(|c| c.parse().ok())
                .unwrap_or(form.category),
            stock: self.stock.unwrap_or_else(|| form.stock.clone()),
        };
        form.apply(fields);
    }
}

// =============================================================================
// Save / Delete
// =============================================================================

/// Save the dialog: update when editing, insert otherwise.
#[instrument(skip_all)]
pub async fn save(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    session: Session,
    headers: HeaderMap,
    Form(fields): Form<ProductFields>,
) -> Result<Response> {
    let mut form = load_product_form(&session).await?.unwrap_or_default();
    form.apply(fields);

    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            tracing::warn!(error = %e, "Product form rejected");
            save_product_form(&session, &form).await?;
            push_notice(&session, Notice::error("Error", "Failed to save product.")).await?;
            return Ok(htmx::redirect(&headers, PRODUCTS_TAB));
        }
    };

    let backend = state.backend();
    let (saved, success) = match form.editing {
        Some(id) => (
            backend.update_product(&user.access_token, id, &draft).await,
            "Product updated successfully.",
        ),
        None => (
            backend.insert_product(&user.access_token, &draft).await,
            "Product added successfully.",
        ),
    };

    match saved {
        Ok(()) => {
            tracing::info!(editing = ?form.editing, "Product saved");
            close_product_form(&session).await?;
            push_notice(&session, Notice::success("Success", success)).await?;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save product");
            save_product_form(&session, &form).await?;
            push_notice(&session, Notice::error("Error", "Failed to save product.")).await?;
        }
    }

    Ok(htmx::redirect(&headers, PRODUCTS_TAB))
}

/// Delete confirmation.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirmed: Option<String>,
}

/// Delete a product once the admin has confirmed.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<ProductId>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    if form.confirmed.as_deref() != Some("true") {
        tracing::debug!(product_id = %id, "Delete not confirmed");
        return Ok(htmx::redirect(&headers, PRODUCTS_TAB));
    }

    let notice = match state
        .backend()
        .delete_product(&user.access_token, id)
        .await
    {
        Ok(()) => {
            tracing::info!(product_id = %id, "Product deleted");
            Notice::success("Success", "Product deleted successfully.")
        }
        Err(e) => {
            tracing::error!(error = %e, product_id = %id, "Failed to delete product");
            Notice::error("Error", "Failed to delete product.")
        }
    };
    push_notice(&session, notice).await?;

    Ok(htmx::redirect(&headers, PRODUCTS_TAB))
}
