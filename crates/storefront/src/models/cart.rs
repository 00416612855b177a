//! Cart line rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use savanna_core::{CartItemId, ProductId, SessionToken};

use super::Product;

/// A row of the `cart_items` table.
///
/// Invariant (application-enforced, not a database constraint): at most one
/// line exists per (session, product, size, color) tuple. The add operation
/// merges duplicates by bumping `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub user_session_id: SessionToken,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Selected size; `None` and `""` are the same canonical "no size".
    #[serde(default)]
    pub selected_size: Option<String>,
    /// Selected color; `None` and `""` are the same canonical "no color".
    #[serde(default)]
    pub selected_color: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CartLine {
    /// Size for display/matching, with absence normalized to `""`.
    #[must_use]
    pub fn size(&self) -> &str {
        self.selected_size.as_deref().unwrap_or("")
    }

    /// Color for display/matching, with absence normalized to `""`.
    #[must_use]
    pub fn color(&self) -> &str {
        self.selected_color.as_deref().unwrap_or("")
    }
}

/// A cart line hydrated with its product row.
///
/// `product` is `None` when the referenced product has been removed from the
/// catalog; such lines price at zero instead of failing the cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineDetail {
    #[serde(flatten)]
    pub line: CartLine,
    pub product: Option<Product>,
}

impl CartLineDetail {
    /// Undiscounted list price of the referenced product, zero if missing.
    #[must_use]
    pub fn list_price(&self) -> Decimal {
        self.product
            .as_ref()
            .map_or_else(Decimal::default, |p| p.price)
    }

    /// Discounted subtotal for this line.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        savanna_core::line_subtotal(self.list_price(), self.line.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_variant_normalizes_to_empty() {
        let line: CartLine = serde_json::from_value(json!({
            "id": "c1",
            "user_session_id": "session_1_a",
            "product_id": "p1",
            "quantity": 2,
            "selected_size": null,
            "selected_color": "Red"
        }))
        .expect("cart line");

        assert_eq!(line.size(), "");
        assert_eq!(line.color(), "Red");
    }

    #[test]
    fn test_detail_prices_missing_product_at_zero() {
        let line: CartLine = serde_json::from_value(json!({
            "id": "c1",
            "user_session_id": "session_1_a",
            "product_id": "p-deleted",
            "quantity": 3
        }))
        .expect("cart line");

        let detail = CartLineDetail {
            line,
            product: None,
        };
        assert_eq!(detail.list_price(), Decimal::ZERO);
        assert_eq!(detail.subtotal(), Decimal::ZERO);
    }
}
