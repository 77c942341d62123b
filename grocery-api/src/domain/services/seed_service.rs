use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::models::Product;
use crate::domain::repositories::ProductRepository;
use crate::domain::validation::NewProduct;
use crate::error::AppError;
use crate::server::AppState;

/// 默认超市商品目录
const DEFAULT_CATALOG: [(&str, f64); 20] = [
    ("Bananas (1 kg)", 1.99),
    ("Apples (1 kg)", 2.49),
    ("Tomatoes (1 kg)", 2.99),
    ("Potatoes (2.5 kg)", 3.99),
    ("Onions (1 kg)", 1.49),
    ("Carrots (1 kg)", 1.59),
    ("Milk (1 L)", 1.19),
    ("Eggs (12 pack)", 3.49),
    ("Bread (White)", 2.29),
    ("Butter (250g)", 3.79),
    ("Cheese (Cheddar 400g)", 4.99),
    ("Chicken Breast (500g)", 5.99),
    ("Rice (1 kg)", 2.19),
    ("Pasta (500g)", 1.29),
    ("Orange Juice (1 L)", 2.99),
    ("Coffee (250g)", 5.49),
    ("Sugar (1 kg)", 1.89),
    ("Olive Oil (500ml)", 6.99),
    ("Yogurt (500g)", 2.49),
    ("Cereal (375g)", 3.99),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedOutcome {
    pub message: String,
    pub count: i64,
}

pub struct SeedService {
    state: Arc<AppState>,
}

impl SeedService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Inserts the default catalog when no product exists yet.
    pub async fn seed(&self) -> Result<SeedOutcome, AppError> {
        let mut tx = self.state.db.begin().await?;

        let existing = ProductRepository::count(&mut tx).await?;
        if existing > 0 {
            return Ok(SeedOutcome {
                message: "Database already seeded".to_string(),
                count: existing,
            });
        }

        for (index, (name, price)) in DEFAULT_CATALOG.iter().enumerate() {
            let product = Product::new(NewProduct {
                name: name.to_string(),
                price: *price,
                sku: Some(catalog_sku(name, index)),
            });
            ProductRepository::insert(&mut tx, &product).await?;
        }

        tx.commit().await?;

        info!(count = DEFAULT_CATALOG.len(), "default catalog seeded");
        Ok(SeedOutcome {
            message: "Database seeded successfully".to_string(),
            count: DEFAULT_CATALOG.len() as i64,
        })
    }
}

/// `SKU-<前三个字母大写>-<序号>`
fn catalog_sku(name: &str, index: usize) -> String {
    let prefix: String = name.chars().take(3).collect::<String>().to_uppercase();
    format!("SKU-{}-{:03}", prefix, index + 1)
}
