use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::cart::{CartLine, Priced};
use super::product::Product;

/// 已完成的结账记录，创建后不可修改
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<TransactionLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
    pub product: Option<Product>,
}

/// A transaction about to be written, priced from the cart at checkout time.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub id: String,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<DraftItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftItem {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

impl TransactionDraft {
    /// Freezes the current prices of `lines`. A line whose product no longer
    /// exists is recorded at a unit price of 0.
    pub fn from_cart(lines: &[CartLine]) -> Self {
        let items: Vec<DraftItem> = lines
            .iter()
            .map(|line| {
                let unit_price = line.unit_price().unwrap_or(0.0);
                DraftItem {
                    id: Uuid::new_v4().to_string(),
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    unit_price,
                    line_total: unit_price * line.quantity as f64,
                }
            })
            .collect();
        let total = items.iter().map(|item| item.line_total).sum();

        Self {
            id: Uuid::new_v4().to_string(),
            total,
            created_at: Utc::now(),
            items,
        }
    }

    /// Every line total and the grand total are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.total.is_finite() && self.items.iter().all(|item| item.line_total.is_finite())
    }
}
