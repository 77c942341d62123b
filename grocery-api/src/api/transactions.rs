use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::domain::models::Transaction;
use crate::domain::services::transaction_service::TransactionService;
use crate::response::{ApiResponse, ApiResult};
use crate::server::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_transactions))
        .route("/{id}", get(get_transaction))
}

async fn list_transactions(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Transaction>> {
    let transactions = TransactionService::new(state).list_transactions().await?;
    Ok(ApiResponse::ok(transactions))
}

async fn get_transaction(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Transaction> {
    let transaction = TransactionService::new(state).get_transaction(&id).await?;
    Ok(ApiResponse::ok(transaction))
}
