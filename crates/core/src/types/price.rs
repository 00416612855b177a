//! Storewide discount math and price formatting.
//!
//! Every list price on the site carries a flat 50% markdown. The markdown is
//! applied through the functions in this module only, so product cards, cart
//! lines, totals, and the checkout summary can never disagree on rounding:
//!
//! - a single displayed price is `floor(list_price * 0.5)`
//! - a cart total is `floor(sum(quantity * list_price) * 0.5)` - one rounding
//!   over the undiscounted sum, never per line
//!
//! Prices are Kenyan Shillings represented as [`Decimal`] (the remote store's
//! `price` column is numeric).

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// The flat storewide markdown, as a percentage of the list price.
pub const DISCOUNT_PERCENT: u32 = 50;

/// Discounted display price for a single unit: `floor(list_price * 0.5)`.
#[must_use]
pub fn discounted(list_price: Decimal) -> Decimal {
    (list_price / Decimal::TWO).floor()
}

/// Discounted subtotal for one cart line.
#[must_use]
pub fn line_subtotal(list_price: Decimal, quantity: i64) -> Decimal {
    discounted(list_price * Decimal::from(quantity))
}

/// Discounted grand total for a cart.
///
/// Sums the undiscounted line amounts first and rounds once, so the total
/// matches `sum(quantity * price) * 0.5` exactly for whole-shilling prices.
#[must_use]
pub fn cart_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i64)>,
{
    let gross: Decimal = lines
        .into_iter()
        .map(|(price, quantity)| price * Decimal::from(quantity))
        .sum();
    discounted(gross)
}

/// Format an amount as Kenyan Shillings with thousands separators,
/// e.g. `KSh 1,250`.
///
/// Whole amounts print without a fraction; fractional amounts print with two
/// decimal places.
#[must_use]
pub fn format_ksh(amount: Decimal) -> String {
    let fraction = amount - amount.floor();
    let (integer_part, decimal_part) = if fraction.is_zero() {
        (amount.floor(), None)
    } else {
        let rounded = amount.round_dp(2);
        (rounded.floor(), Some(rounded - rounded.floor()))
    };

    let grouped = group_thousands(&integer_part.to_string());
    match decimal_part {
        Some(frac) => {
            // `frac` is in [0, 1); render its two decimal digits.
            let cents = (frac * Decimal::from(100)).round().to_u32().unwrap_or(0);
            format!("KSh {grouped}.{cents:02}")
        }
        None => format!("KSh {grouped}"),
    }
}

/// Insert `,` thousands separators into a plain integer string.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = digits
        .strip_prefix('-')
        .map_or(("", digits), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let chars: Vec<char> = digits.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    format!("{sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_discounted_halves_even_prices() {
        assert_eq!(discounted(dec(2000)), dec(1000));
        assert_eq!(discounted(dec(500)), dec(250));
    }

    #[test]
    fn test_discounted_floors_odd_prices() {
        // floor(1999 * 0.5) = floor(999.5) = 999
        assert_eq!(discounted(dec(1999)), dec(999));
        assert_eq!(discounted(dec(1)), dec(0));
    }

    #[test]
    fn test_line_subtotal() {
        assert_eq!(line_subtotal(dec(1000), 3), dec(1500));
        assert_eq!(line_subtotal(dec(999), 1), dec(499));
    }

    #[test]
    fn test_cart_total_rounds_once() {
        // (1000*2 + 500*1) * 0.5 = 1250
        let total = cart_total([(dec(1000), 2), (dec(500), 1)]);
        assert_eq!(total, dec(1250));
    }

    #[test]
    fn test_cart_total_empty() {
        assert_eq!(cart_total(std::iter::empty()), dec(0));
    }

    #[test]
    fn test_format_ksh_groups_thousands() {
        assert_eq!(format_ksh(dec(1250)), "KSh 1,250");
        assert_eq!(format_ksh(dec(999)), "KSh 999");
        assert_eq!(format_ksh(dec(1_234_567)), "KSh 1,234,567");
    }

    #[test]
    fn test_format_ksh_fractional() {
        let amount = Decimal::new(125050, 2); // 1250.50
        assert_eq!(format_ksh(amount), "KSh 1,250.50");
    }
}
