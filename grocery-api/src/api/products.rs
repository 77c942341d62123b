use axum::{
    extract::{Path, State},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::extract::JsonBody;
use crate::domain::models::Product;
use crate::domain::services::product_service::ProductService;
use crate::domain::validation::{parse_product_create, parse_product_update};
use crate::error::AppError;
use crate::middleware::rate_limit::limit_product_mutations;
use crate::response::{ApiResponse, ApiResult};
use crate::server::AppState;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product).put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(state, limit_product_mutations))
}

async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Product>> {
    let products = ProductService::new(state).list_products().await?;
    Ok(ApiResponse::ok(products))
}

async fn get_product(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Product> {
    let product = ProductService::new(state).get_product(&id).await?;
    Ok(ApiResponse::ok(product))
}

async fn create_product(State(state): State<Arc<AppState>>, JsonBody(body): JsonBody) -> ApiResult<Product> {
    let input = parse_product_create(&body).map_err(|e| AppError::validation("Invalid product", e))?;

    let product = ProductService::new(state).create_product(input).await?;
    Ok(ApiResponse::created(product))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Product> {
    let patch = parse_product_update(&body).map_err(|e| AppError::validation("Invalid update", e))?;

    let product = ProductService::new(state).update_product(&id, patch).await?;
    Ok(ApiResponse::ok(product))
}

async fn delete_product(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Product> {
    let removed = ProductService::new(state).delete_product(&id).await?;
    Ok(ApiResponse::ok(removed))
}
