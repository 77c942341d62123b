//! The single global cart.
//!
//! There is exactly one cart and it has no owner key; every `CartLine` row
//! belongs to it. A line whose product was deleted keeps its `product_id`
//! and is rendered with `product: null`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::product::Product;

/// 可参与金额计算的条目
pub trait Priced {
    fn quantity(&self) -> i64;
    fn unit_price(&self) -> Option<f64>;
}

/// Σ quantity × price; lines without a product contribute nothing.
pub fn compute_cart_total<T: Priced>(items: &[T]) -> f64 {
    items.iter().fold(0.0, |sum, item| {
        sum + item.unit_price().unwrap_or(0.0) * item.quantity() as f64
    })
}

/// A cart row without its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
}

/// 单个购物车条目的数量上限
pub const MAX_LINE_QUANTITY: i64 = 10_000;

/// Merge policy for adding to the cart.
///
/// An existing entry for `product_id` has its quantity increased; other
/// entries are returned unchanged and in order. Otherwise a new entry is
/// appended. Returns `None` when the resulting quantity would exceed
/// [`MAX_LINE_QUANTITY`]. `CartRepository::add_or_increment` applies the same
/// rule in a single statement.
pub fn add_or_increment(entries: &[CartEntry], product_id: &str, quantity: i64) -> Option<Vec<CartEntry>> {
    let merged = |current: i64| current.checked_add(quantity).filter(|q| *q <= MAX_LINE_QUANTITY);

    if let Some(existing) = entries.iter().find(|entry| entry.product_id == product_id) {
        let quantity = merged(existing.quantity)?;
        return Some(
            entries
                .iter()
                .map(|entry| {
                    if entry.product_id == product_id {
                        CartEntry {
                            quantity,
                            ..entry.clone()
                        }
                    } else {
                        entry.clone()
                    }
                })
                .collect(),
        );
    }

    let quantity = merged(0)?;
    let mut next = entries.to_vec();
    next.push(CartEntry {
        id: Uuid::new_v4().to_string(),
        product_id: product_id.to_string(),
        quantity,
    });
    Some(next)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub product: Option<Product>,
}

impl Priced for CartLine {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn unit_price(&self) -> Option<f64> {
        self.product.as_ref().map(|product| product.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cart {
    pub items: Vec<CartLine>,
    pub total: f64,
}

impl Cart {
    pub fn new(items: Vec<CartLine>) -> Self {
        let total = compute_cart_total(&items);
        Self { items, total }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: &str, price: f64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("product {id}"),
            price,
            sku: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn line(quantity: i64, product: Option<Product>) -> CartLine {
        CartLine {
            id: Uuid::new_v4().to_string(),
            product_id: product
                .as_ref()
                .map(|p| p.id.clone())
                .unwrap_or_else(|| "deleted".to_string()),
            quantity,
            created_at: Utc::now(),
            product,
        }
    }

    fn entry(id: &str, product_id: &str, quantity: i64) -> CartEntry {
        CartEntry {
            id: id.to_string(),
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn total_of_empty_cart_is_zero() {
        let items: Vec<CartLine> = Vec::new();
        assert_eq!(compute_cart_total(&items), 0.0);
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let items = vec![line(2, Some(product("a", 3.0))), line(1, Some(product("b", 4.5)))];
        assert!((compute_cart_total(&items) - 10.5).abs() < 1e-9);
    }

    #[test]
    fn total_ignores_deleted_products() {
        let items = vec![line(2, None), line(1, Some(product("b", 4.0)))];
        assert_eq!(compute_cart_total(&items), 4.0);
        assert_eq!(Cart::new(items).total, 4.0);
    }

    #[test]
    fn add_appends_when_product_is_absent() {
        let next = add_or_increment(&[], "p1", 2).unwrap();

        assert_eq!(next.len(), 1);
        assert_eq!(next[0].product_id, "p1");
        assert_eq!(next[0].quantity, 2);
    }

    #[test]
    fn add_increments_existing_entry_in_place() {
        let entries = vec![entry("0", "p0", 5), entry("1", "p1", 1), entry("2", "p2", 7)];

        let next = add_or_increment(&entries, "p1", 3).unwrap();

        assert_eq!(next.len(), 3);
        assert_eq!(next[1], entry("1", "p1", 4));
        assert_eq!(next[0], entries[0]);
        assert_eq!(next[2], entries[2]);
    }

    #[test]
    fn add_leaves_input_untouched() {
        let entries = vec![entry("1", "p1", 1)];
        let _ = add_or_increment(&entries, "p1", 3);
        assert_eq!(entries[0].quantity, 1);
    }

    #[test]
    fn add_refuses_quantities_above_the_line_limit() {
        let entries = vec![entry("1", "p1", MAX_LINE_QUANTITY - 1)];

        let next = add_or_increment(&entries, "p1", 1).unwrap();
        assert_eq!(next[0].quantity, MAX_LINE_QUANTITY);

        assert_eq!(add_or_increment(&entries, "p1", 2), None);
        assert_eq!(add_or_increment(&[], "p2", MAX_LINE_QUANTITY + 1), None);
    }

    #[test]
    fn add_does_not_overflow() {
        let entries = vec![entry("1", "p1", i64::MAX)];
        assert_eq!(add_or_increment(&entries, "p1", 1), None);
    }
}
