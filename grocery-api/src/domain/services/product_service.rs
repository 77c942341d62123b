use std::sync::Arc;

use tracing::info;

use crate::domain::models::Product;
use crate::domain::repositories::ProductRepository;
use crate::domain::validation::{FieldErrors, NewProduct, ProductPatch};
use crate::error::AppError;
use crate::server::AppState;

pub struct ProductService {
    state: Arc<AppState>,
}

impl ProductService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let mut conn = self.state.db.acquire().await?;
        Ok(ProductRepository::list(&mut conn).await?)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, AppError> {
        let mut conn = self.state.db.acquire().await?;
        ProductRepository::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    pub async fn create_product(&self, input: NewProduct) -> Result<Product, AppError> {
        let product = Product::new(input);

        let mut conn = self.state.db.acquire().await?;
        ProductRepository::insert(&mut conn, &product)
            .await
            .map_err(sku_conflict)?;

        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product, AppError> {
        let mut conn = self.state.db.acquire().await?;
        let mut product = ProductRepository::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;

        product.apply(patch);

        let updated = ProductRepository::update(&mut conn, &product)
            .await
            .map_err(sku_conflict)?;
        if updated == 0 {
            return Err(AppError::not_found("Product not found"));
        }

        info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    /// 删除商品，返回被删除的记录；购物车中引用它的条目保留
    pub async fn delete_product(&self, id: &str) -> Result<Product, AppError> {
        let mut conn = self.state.db.acquire().await?;
        let product = ProductRepository::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;

        if ProductRepository::delete(&mut conn, id).await? == 0 {
            return Err(AppError::not_found("Product not found"));
        }

        info!(product_id = %product.id, "product deleted");
        Ok(product)
    }
}

fn sku_conflict(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::validation("Invalid product", FieldErrors::field("sku", "SKU already in use"));
        }
    }
    AppError::Database(err)
}
