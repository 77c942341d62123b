use axum::{extract::State, routing::post, Router};
use std::sync::Arc;

use crate::domain::models::Transaction;
use crate::domain::services::checkout_service::CheckoutService;
use crate::response::{ApiResponse, ApiResult};
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(checkout))
}

async fn checkout(State(state): State<Arc<AppState>>) -> ApiResult<Transaction> {
    let transaction = CheckoutService::new(state).checkout().await?;
    Ok(ApiResponse::created(transaction))
}
