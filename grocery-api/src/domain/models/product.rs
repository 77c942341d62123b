use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::validation::{NewProduct, ProductPatch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub sku: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            price: input.price,
            sku: input.sku,
            created_at: now,
            updated_at: now,
        }
    }

    /// 只覆盖 patch 中出现的字段
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(sku) = patch.sku {
            self.sku = Some(sku);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_untouched_fields() {
        let mut product = Product::new(NewProduct {
            name: "Milk (1 L)".into(),
            price: 1.19,
            sku: Some("SKU-MIL".into()),
        });
        let created_at = product.created_at;

        product.apply(ProductPatch {
            price: Some(1.29),
            ..Default::default()
        });

        assert_eq!(product.name, "Milk (1 L)");
        assert_eq!(product.price, 1.29);
        assert_eq!(product.sku.as_deref(), Some("SKU-MIL"));
        assert_eq!(product.created_at, created_at);
        assert!(product.updated_at >= created_at);
    }
}
