use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::Transaction;

const TRANSACTION_COLUMNS: &str = r#"
    id, user_id, external_id, date, name, merchant_name, amount, iso_currency_code,
    category, eco_score, cashback_usd, needs_receipt, created_at
"#;

/// Read access to transactions. Writes to the eco fields go through
/// [`ReceiptRepository`](super::receipt::ReceiptRepository).
pub struct TransactionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a transaction by ID, only if it belongs to the user
    pub async fn find_for_user(&self, user_id: i64, transaction_id: i64) -> Result<Transaction> {
        let query = format!(
            "SELECT {} FROM transactions WHERE id = $1 AND user_id = $2",
            TRANSACTION_COLUMNS
        );

        let transaction = sqlx::query_as::<_, Transaction>(&query)
            .bind(transaction_id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(transaction)
    }
}
