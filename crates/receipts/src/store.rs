use storage::Database;
use storage::models::{ReceiptReplacement, Transaction};
use storage::repository::{receipt::ReceiptRepository, transaction::TransactionRepository};

use crate::Result;

/// Persistence the receipt processor needs.
///
/// `replace_receipt` must be all-or-nothing: either every part of the
/// replacement is visible afterwards or none of it is.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    /// The user's transaction, or [`ReceiptsError::NotFound`](crate::ReceiptsError::NotFound).
    async fn find_transaction(&self, user_id: i64, transaction_id: i64) -> Result<Transaction>;

    async fn replace_receipt(&self, replacement: &ReceiptReplacement) -> Result<()>;
}

#[async_trait::async_trait]
impl TransactionStore for Database {
    async fn find_transaction(&self, user_id: i64, transaction_id: i64) -> Result<Transaction> {
        let repo = TransactionRepository::new(self.pool());
        Ok(repo.find_for_user(user_id, transaction_id).await?)
    }

    async fn replace_receipt(&self, replacement: &ReceiptReplacement) -> Result<()> {
        let repo = ReceiptRepository::new(self.pool());
        let inserted = repo.replace_items(replacement).await?;
        tracing::debug!(
            "Stored {} receipt items for transaction {}",
            inserted,
            replacement.transaction_id
        );
        Ok(())
    }
}
