use axum::{
    extract::{Path, State},
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::api::extract::JsonBody;
use crate::domain::models::Cart;
use crate::domain::services::cart_service::CartService;
use crate::domain::validation::{parse_cart_item_add, parse_cart_item_update};
use crate::error::AppError;
use crate::response::{ApiResponse, ApiResult};
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_cart).post(add_item))
        .route("/{id}", put(update_item).delete(remove_item))
}

async fn get_cart(State(state): State<Arc<AppState>>) -> ApiResult<Cart> {
    let cart = CartService::new(state).get_cart().await?;
    Ok(ApiResponse::ok(cart))
}

async fn add_item(State(state): State<Arc<AppState>>, JsonBody(body): JsonBody) -> ApiResult<Cart> {
    let input = parse_cart_item_add(&body).map_err(|e| AppError::validation("Invalid cart item", e))?;

    let cart = CartService::new(state).add_item(input).await?;
    Ok(ApiResponse::created(cart))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Cart> {
    let update = parse_cart_item_update(&body).map_err(|e| AppError::validation("Invalid cart item", e))?;

    let cart = CartService::new(state).update_item(&id, update).await?;
    Ok(ApiResponse::ok(cart))
}

async fn remove_item(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Cart> {
    let cart = CartService::new(state).remove_item(&id).await?;
    Ok(ApiResponse::ok(cart))
}
