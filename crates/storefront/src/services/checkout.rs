//! WhatsApp checkout handoff.
//!
//! Checkout is a fire-and-forget navigation: the storefront builds a
//! human-readable order summary, URL-encodes it into a `wa.me` deep link, and
//! the client opens it. There is no structured API and no response handling.
//! These are pure builders so the exact message shape is testable.

use rust_decimal::Decimal;

use savanna_core::{cart_total, format_ksh, DISCOUNT_PERCENT};

use crate::models::{CartLineDetail, Product};

/// Placeholder shown for an unselected size/color.
const NO_VARIANT: &str = "N/A";

/// Name shown for a cart line whose product vanished from the catalog.
const UNKNOWN_ITEM: &str = "Unknown item";

/// Build a `wa.me` link carrying `message` to `phone` (digits only).
#[must_use]
pub fn wa_link(phone: &str, message: &str) -> String {
    format!("https://wa.me/{phone}?text={}", urlencoding::encode(message))
}

fn variant_or_placeholder(value: &str) -> &str {
    if value.is_empty() { NO_VARIANT } else { value }
}

/// Link for ordering a single product directly from its card.
#[must_use]
pub fn product_order_link(phone: &str, product: &Product, size: &str, color: &str) -> String {
    let message = format!(
        "Hi, I'd like to order {} (Size: {}, Color: {}) at {} ({DISCOUNT_PERCENT}% OFF). Is it available?",
        product.name,
        variant_or_placeholder(size),
        variant_or_placeholder(color),
        format_ksh(product.discounted_price()),
    );
    wa_link(phone, &message)
}

/// Discounted grand total for a hydrated cart.
#[must_use]
pub fn checkout_total(items: &[CartLineDetail]) -> Decimal {
    cart_total(
        items
            .iter()
            .map(|item| (item.list_price(), item.line.quantity)),
    )
}

/// The plain-text order summary for a cart checkout.
///
/// One line per cart item, then the discounted total.
#[must_use]
pub fn checkout_message(items: &[CartLineDetail]) -> String {
    let summary = items
        .iter()
        .map(|item| {
            let name = item
                .product
                .as_ref()
                .map_or(UNKNOWN_ITEM, |p| p.name.as_str());
            format!(
                "{name} (Qty: {}, Color: {}, Size: {})",
                item.line.quantity,
                variant_or_placeholder(item.line.color()),
                variant_or_placeholder(item.line.size()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let total = format_ksh(checkout_total(items));
    format!(
        "Hi, I'd like to order the following items:\n\n{summary}\n\nTotal ({DISCOUNT_PERCENT}% OFF): {total}\n\nPlease confirm availability and proceed with checkout."
    )
}

/// Link for checking out the whole cart.
#[must_use]
pub fn cart_checkout_link(phone: &str, items: &[CartLineDetail]) -> String {
    wa_link(phone, &checkout_message(items))
}
