//! SQL access, one repository per aggregate.
//!
//! Every method takes a `&mut SqliteConnection` so the same query runs on a
//! pooled connection or inside an open `sqlx::Transaction`.

pub mod cart_repository;
pub mod product_repository;
pub mod transaction_repository;

pub use cart_repository::CartRepository;
pub use product_repository::ProductRepository;
pub use transaction_repository::TransactionRepository;

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::Product;

/// `LEFT JOIN products p` 的列，别名统一带 `p_` 前缀
#[derive(Debug, FromRow)]
pub(crate) struct JoinedProduct {
    p_id: Option<String>,
    p_name: Option<String>,
    p_price: Option<f64>,
    p_sku: Option<String>,
    p_created_at: Option<DateTime<Utc>>,
    p_updated_at: Option<DateTime<Utc>>,
}

impl JoinedProduct {
    pub(crate) const COLUMNS: &'static str = "p.id AS p_id, p.name AS p_name, p.price AS p_price, \
         p.sku AS p_sku, p.created_at AS p_created_at, p.updated_at AS p_updated_at";

    pub(crate) fn into_product(self) -> Option<Product> {
        match (self.p_id, self.p_name, self.p_price, self.p_created_at, self.p_updated_at) {
            (Some(id), Some(name), Some(price), Some(created_at), Some(updated_at)) => Some(Product {
                id,
                name,
                price,
                sku: self.p_sku,
                created_at,
                updated_at,
            }),
            _ => None,
        }
    }
}
