use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::models::{Cart, MAX_LINE_QUANTITY};
use crate::domain::repositories::{CartRepository, ProductRepository};
use crate::domain::validation::{CartItemUpdate, Detection, FieldErrors, NewCartItem};
use crate::error::AppError;
use crate::server::AppState;

pub struct CartService {
    state: Arc<AppState>,
}

impl CartService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn get_cart(&self) -> Result<Cart, AppError> {
        let mut conn = self.state.db.acquire().await?;
        let lines = CartRepository::list(&mut conn).await?;
        Ok(Cart::new(lines))
    }

    /// 加入购物车；已有该商品时累加数量
    pub async fn add_item(&self, input: NewCartItem) -> Result<Cart, AppError> {
        let mut conn = self.state.db.acquire().await?;
        ProductRepository::find_by_id(&mut conn, &input.product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;

        let entry = CartRepository::add_or_increment(&mut conn, &input.product_id, input.quantity)
            .await?
            .ok_or_else(quantity_limit_exceeded)?;
        debug!(cart_item_id = %entry.id, quantity = entry.quantity, "cart line merged");

        let lines = CartRepository::list(&mut conn).await?;
        Ok(Cart::new(lines))
    }

    /// Resolves a scanned label by exact name or SKU and adds it to the cart.
    pub async fn add_detection(&self, detection: Detection) -> Result<Cart, AppError> {
        let mut conn = self.state.db.acquire().await?;
        let product = ProductRepository::find_by_label(&mut conn, &detection.label)
            .await?
            .ok_or_else(|| AppError::ProductUnknown(detection.label.clone()))?;

        let entry = CartRepository::add_or_increment(&mut conn, &product.id, detection.quantity_or_default())
            .await?
            .ok_or_else(quantity_limit_exceeded)?;
        info!(label = %detection.label, product_id = %product.id, quantity = entry.quantity, "detection added to cart");

        let lines = CartRepository::list(&mut conn).await?;
        Ok(Cart::new(lines))
    }

    pub async fn update_item(&self, id: &str, update: CartItemUpdate) -> Result<Cart, AppError> {
        let mut conn = self.state.db.acquire().await?;
        if CartRepository::update_quantity(&mut conn, id, update.quantity).await? == 0 {
            return Err(AppError::not_found("Cart item not found"));
        }

        let lines = CartRepository::list(&mut conn).await?;
        Ok(Cart::new(lines))
    }

    pub async fn remove_item(&self, id: &str) -> Result<Cart, AppError> {
        let mut conn = self.state.db.acquire().await?;
        if CartRepository::delete(&mut conn, id).await? == 0 {
            return Err(AppError::not_found("Cart item not found"));
        }

        let lines = CartRepository::list(&mut conn).await?;
        Ok(Cart::new(lines))
    }
}

fn quantity_limit_exceeded() -> AppError {
    AppError::validation(
        "Invalid cart item",
        FieldErrors::field("quantity", format!("Cart quantity cannot exceed {}", MAX_LINE_QUANTITY)),
    )
}
