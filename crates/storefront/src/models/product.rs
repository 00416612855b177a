//! Product catalog rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use savanna_core::{Category, ProductId};

/// A row of the `products` table.
///
/// The storefront never mutates products; the catalog is maintained out of
/// band (see the CLI seeder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Undiscounted list price in Kenyan Shillings.
    pub price: Decimal,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Discounted display price, per the storewide markdown.
    #[must_use]
    pub fn discounted_price(&self) -> Decimal {
        savanna_core::discounted(self.price)
    }

    /// Does this product's text match a search query?
    ///
    /// Case-insensitive substring match over name, description, and
    /// subcategory.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || self
                .subcategory
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
    }
}
