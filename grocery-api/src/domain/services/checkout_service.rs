use std::sync::Arc;

use tracing::info;

use crate::domain::models::{Transaction, TransactionDraft};
use crate::domain::repositories::{CartRepository, TransactionRepository};
use crate::domain::validation::FieldErrors;
use crate::error::AppError;
use crate::server::AppState;

pub struct CheckoutService {
    state: Arc<AppState>,
}

impl CheckoutService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Converts the whole cart into a transaction and empties the cart.
    ///
    /// Reading the cart, writing the transaction with its items and deleting
    /// the cart lines happen in one database transaction: either all of it
    /// is committed or none of it is. Unit prices are copied from the
    /// products as they are now; later price changes do not touch them.
    pub async fn checkout(&self) -> Result<Transaction, AppError> {
        let mut tx = self.state.db.begin().await?;

        let lines = CartRepository::list(&mut tx).await?;
        if lines.is_empty() {
            // tx 在 drop 时回滚
            return Err(AppError::EmptyCart);
        }

        let draft = TransactionDraft::from_cart(&lines);
        if !draft.is_finite() {
            return Err(AppError::validation(
                "Invalid cart",
                FieldErrors::form("Cart total is out of range"),
            ));
        }
        TransactionRepository::insert(&mut tx, &draft).await?;
        let cleared = CartRepository::clear(&mut tx).await?;

        let transaction = TransactionRepository::find_by_id(&mut tx, &draft.id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("transaction {} missing after insert", draft.id)))?;

        tx.commit().await?;

        info!(
            transaction_id = %transaction.id,
            total = transaction.total,
            lines = cleared,
            "checkout committed"
        );
        Ok(transaction)
    }
}
