//! Inventory listing.
//!
//! # Usage
//!
//! ```bash
//! glam-cli products list
//! ```

use secrecy::ExposeSecret;

use gemini_glam_core::Product;
use gemini_glam_storefront::supabase::Backend;

use super::{BackendCommandError, service_client};

/// Print every product, newest first.
pub async fn list() -> Result<(), BackendCommandError> {
    let (client, key) = service_client()?;
    let products = client.list_products(key.expose_secret()).await?;

    tracing::info!("{} products", products.len());

    #[allow(clippy::print_stdout)]
    for product in &products {
        println!("{}", format_row(product));
    }
    Ok(())
}

fn format_row(product: &Product) -> String {
    format!(
        "{id}  {name:<32} {category:<10} {price:>12} {stock:>6} in stock",
        id = product.id,
        name = product.name,
        category = product.category.as_str(),
        price = product.display_price(),
        stock = product.stock,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use gemini_glam_core::{Category, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_row_shows_price_and_stock() {
        let product = Product {
            id: ProductId::random(),
            name: "Aurora Ring".to_string(),
            description: None,
            price: Decimal::new(189_000, 2),
            image_url: None,
            category: Category::Rings,
            stock: 4,
            created_at: Utc::now(),
        };

        let row = format_row(&product);
        assert!(row.starts_with(&product.id.to_string()));
        assert!(row.contains("Aurora Ring"));
        assert!(row.contains("rings"));
        assert!(row.contains("$1890.00"));
        assert!(row.contains("4 in stock"));
    }
}
