use axum::{extract::State, routing::post, Router};
use std::sync::Arc;

use crate::api::extract::JsonBody;
use crate::domain::models::Cart;
use crate::domain::services::cart_service::CartService;
use crate::domain::validation::parse_detection;
use crate::error::AppError;
use crate::response::{ApiResponse, ApiResult};
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_detection))
}

/// 扫码加购: 按名称或 SKU 找到商品后并入购物车
async fn create_detection(State(state): State<Arc<AppState>>, JsonBody(body): JsonBody) -> ApiResult<Cart> {
    let detection = parse_detection(&body).map_err(|e| AppError::validation("Invalid payload", e))?;

    let cart = CartService::new(state).add_detection(detection).await?;
    Ok(ApiResponse::created(cart))
}
