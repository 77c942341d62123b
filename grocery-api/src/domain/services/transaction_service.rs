use std::sync::Arc;

use crate::domain::models::Transaction;
use crate::domain::repositories::TransactionRepository;
use crate::error::AppError;
use crate::server::AppState;

pub struct TransactionService {
    state: Arc<AppState>,
}

impl TransactionService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        let mut conn = self.state.db.acquire().await?;
        Ok(TransactionRepository::list(&mut conn).await?)
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Transaction, AppError> {
        let mut conn = self.state.db.acquire().await?;
        TransactionRepository::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("Transaction not found"))
    }
}
