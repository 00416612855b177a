//! Seed the remote store's `products` table.
//!
//! Reads product rows from a JSON file (an array of objects matching the
//! `products` columns) or falls back to a small built-in sample catalog, and
//! inserts them one at a time through the same REST client the storefront
//! uses.

use std::path::Path;

use serde_json::{Value, json};
use tracing::{info, warn};

use savanna_core::Category;
use savanna_storefront::config::StorefrontConfig;
use savanna_storefront::services::catalog::PRODUCTS_TABLE;
use savanna_storefront::store::{RestStore, TabularStore};

/// Seed products from `file`, or from the built-in sample catalog when
/// `file` is `None`.
///
/// # Errors
///
/// Returns an error if configuration is missing, the file cannot be read or
/// parsed, or the store rejects every insert.
pub async fn products(file: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = StorefrontConfig::from_env()?;
    let store = RestStore::new(&config.store);

    let rows = match file {
        Some(path) => load_rows(Path::new(path)).await?,
        None => sample_catalog(),
    };
    validate_rows(&rows)?;

    info!(count = rows.len(), "Seeding products");

    let mut inserted = 0usize;
    let mut failed = 0usize;
    for row in rows {
        let name = row
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_owned();
        match store.insert(PRODUCTS_TABLE, row).await {
            Ok(_) => {
                inserted += 1;
                info!(%name, "Inserted product");
            }
            Err(e) => {
                failed += 1;
                warn!(%name, error = %e, "Insert failed");
            }
        }
    }

    info!(inserted, failed, "Seeding complete");
    if inserted == 0 && failed > 0 {
        return Err("no products were inserted".into());
    }
    Ok(())
}

/// Read an array of product rows from a JSON file.
async fn load_rows(path: &Path) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let rows: Vec<Value> = serde_json::from_str(&content)?;
    info!(path = %path.display(), count = rows.len(), "Loaded products from file");
    Ok(rows)
}

/// Reject rows the storefront could never deserialize, before any of them
/// reach the store.
///
/// Every row must carry a `category` that parses as a known [`Category`];
/// anything else would poison catalog listings for the whole table.
fn validate_rows(rows: &[Value]) -> Result<(), Box<dyn std::error::Error>> {
    for (index, row) in rows.iter().enumerate() {
        let category = row
            .get("category")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("row {index}: missing category"))?;
        category
            .parse::<Category>()
            .map_err(|e| format!("row {index}: {e}"))?;
    }
    Ok(())
}

/// A small catalog for fresh environments and demos.
fn sample_catalog() -> Vec<Value> {
    vec![
        json!({
            "name": "Maasai Print Shirt",
            "category": "men",
            "subcategory": "Shirts",
            "description": "Bold ankara cotton shirt with a relaxed fit",
            "price": 1999,
            "colors": ["Red", "Blue"],
            "sizes": ["S", "M", "L", "XL"],
            "featured": true,
            "sort_order": 1
        }),
        json!({
            "name": "Kitenge Wrap Dress",
            "category": "women",
            "subcategory": "Dresses",
            "description": "Flowing kitenge wrap dress, knee length",
            "price": 2499,
            "colors": ["Green", "Yellow"],
            "sizes": ["S", "M", "L"],
            "featured": true,
            "sort_order": 2
        }),
        json!({
            "name": "Safari Cargo Trousers",
            "category": "men",
            "subcategory": "Trousers",
            "description": "Hard-wearing cotton twill cargos",
            "price": 1799,
            "colors": ["Khaki", "Olive"],
            "sizes": ["M", "L", "XL"],
            "sort_order": 3
        }),
        json!({
            "name": "Nairobi Skyline Tee",
            "category": "unisex",
            "subcategory": "T-Shirts",
            "description": "Soft cotton tee with a skyline print",
            "price": 899,
            "colors": ["Black", "White"],
            "sizes": ["XS", "S", "M", "L", "XL"],
            "sort_order": 4
        }),
        json!({
            "name": "Beaded Leather Sandals",
            "category": "women",
            "subcategory": "Footwear",
            "description": "Hand-beaded flat leather sandals",
            "price": 1499,
            "colors": ["Brown"],
            "sizes": ["36", "37", "38", "39", "40"],
            "sort_order": 5
        }),
        json!({
            "name": "Ankara Bomber Jacket",
            "category": "unisex",
            "subcategory": "Jackets",
            "description": "Statement bomber with ankara panels",
            "price": 3499,
            "colors": ["Multi"],
            "sizes": ["M", "L"],
            "featured": true,
            "sort_order": 6
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_passes_validation() {
        validate_rows(&sample_catalog()).expect("built-in catalog is valid");
    }

    #[test]
    fn test_validate_rejects_unknown_category() {
        let rows = vec![json!({"name": "Kids Tee", "category": "kids", "price": 500})];
        let err = validate_rows(&rows).expect_err("unknown category");
        assert!(err.to_string().contains("unknown category: kids"));
    }

    #[test]
    fn test_validate_rejects_missing_category() {
        let rows = vec![json!({"name": "Mystery Item", "price": 500})];
        let err = validate_rows(&rows).expect_err("missing category");
        assert!(err.to_string().contains("row 0: missing category"));
    }
}
