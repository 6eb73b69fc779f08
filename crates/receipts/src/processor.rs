use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use storage::dto::receipt::UploadReceiptResponse;
use storage::models::ReceiptReplacement;
use storage::services::eco_scoring;
use tokio::sync::OwnedMutexGuard;
use tracing::info;

use crate::config::ReceiptsConfig;
use crate::scorer::{ReceiptScorer, aggregate};
use crate::store::TransactionStore;
use crate::{ReceiptsError, Result};

/// One async mutex per transaction id, created on demand and dropped once
/// nobody holds or waits on it.
#[derive(Default)]
struct TransactionLocks {
    locks: Mutex<HashMap<i64, Weak<tokio::sync::Mutex<()>>>>,
}

impl TransactionLocks {
    async fn acquire(&self, transaction_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, weak| weak.strong_count() > 0);

            match locks.get(&transaction_id).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(tokio::sync::Mutex::new(()));
                    locks.insert(transaction_id, Arc::downgrade(&lock));
                    lock
                }
            }
        };

        lock.lock_owned().await
    }
}

/// Runs a receipt upload end to end: ownership check, extraction, footprint
/// estimation, scoring and the atomic write of the results.
///
/// Uploads for the same transaction run one at a time; different transactions
/// never wait on each other.
pub struct ReceiptProcessor {
    store: Arc<dyn TransactionStore>,
    scorer: ReceiptScorer,
    locks: TransactionLocks,
}

impl ReceiptProcessor {
    pub fn new(store: Arc<dyn TransactionStore>, scorer: ReceiptScorer) -> Self {
        Self {
            store,
            scorer,
            locks: TransactionLocks::default(),
        }
    }

    pub fn from_config(store: Arc<dyn TransactionStore>, config: &ReceiptsConfig) -> Result<Self> {
        Ok(Self::new(store, ReceiptScorer::from_config(config)?))
    }

    pub async fn process_upload(
        &self,
        user_id: i64,
        transaction_id: i64,
        image: &[u8],
    ) -> Result<UploadReceiptResponse> {
        let _guard = self.locks.acquire(transaction_id).await;

        let transaction = self.store.find_transaction(user_id, transaction_id).await?;

        info!(
            "Processing receipt for transaction {} ({} bytes)",
            transaction.id,
            image.len()
        );

        let extracted = self.scorer.extract(image).await;
        if extracted.is_empty() {
            return Err(ReceiptsError::BadRequest(
                "Could not parse receipt".to_string(),
            ));
        }

        let items = self.scorer.score_items(&extracted).await;
        let eco_score = aggregate(&items);
        let cashback_usd = eco_scoring::compute_cashback(transaction.amount, Some(eco_score));
        let item_count = items.len();

        self.store
            .replace_receipt(&ReceiptReplacement {
                transaction_id: transaction.id,
                items,
                eco_score,
                cashback_usd,
            })
            .await?;

        info!(
            "Transaction {} scored {} from {} items, cashback {}",
            transaction.id, eco_score, item_count, cashback_usd
        );

        Ok(UploadReceiptResponse {
            transaction_id: transaction.id,
            eco_score: eco_score.value(),
            cashback_amount: eco_scoring::format_currency(cashback_usd),
            item_count,
        })
    }
}
