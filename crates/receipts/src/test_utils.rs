//! Test doubles for the processor: an in-memory store and scripted adapters.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use storage::error::StorageError;
use storage::models::{NewReceiptItem, ReceiptReplacement, Transaction};

use crate::models::ReceiptLineItem;
use crate::store::TransactionStore;
use crate::traits::{FootprintSource, ReceiptExtractor};
use crate::{ReceiptsError, Result};

/// A transaction with no eco fields set yet.
pub fn sample_transaction(id: i64, user_id: i64, amount: &str) -> Transaction {
    let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    Transaction {
        id,
        user_id,
        external_id: Some(format!("test-{}", id)),
        date,
        name: "Whole Foods Groceries".to_string(),
        merchant_name: Some("Whole Foods".to_string()),
        amount: Decimal::from_str(amount).unwrap(),
        iso_currency_code: Some("USD".to_string()),
        category: Some(vec!["Shops".to_string(), "Groceries".to_string()]),
        eco_score: None,
        cashback_usd: None,
        needs_receipt: true,
        created_at: date.and_hms_opt(12, 0, 0).unwrap(),
    }
}

#[derive(Default)]
struct MemoryState {
    transactions: HashMap<i64, Transaction>,
    items: HashMap<i64, Vec<NewReceiptItem>>,
}

/// Applies each replacement under one lock, so readers never see half of it.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_next_write: AtomicBool,
    writes: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryStore {
    pub fn with(transactions: Vec<Transaction>) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for tx in transactions {
                state.transactions.insert(tx.id, tx);
            }
        }
        store
    }

    pub fn transaction(&self, id: i64) -> Option<Transaction> {
        self.state.lock().unwrap().transactions.get(&id).cloned()
    }

    pub fn items(&self, transaction_id: i64) -> Vec<NewReceiptItem> {
        self.state
            .lock()
            .unwrap()
            .items
            .get(&transaction_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Successful replacements so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_writes(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TransactionStore for MemoryStore {
    async fn find_transaction(&self, user_id: i64, transaction_id: i64) -> Result<Transaction> {
        self.transaction(transaction_id)
            .filter(|tx| tx.user_id == user_id)
            .ok_or(ReceiptsError::NotFound)
    }

    async fn replace_receipt(&self, replacement: &ReceiptReplacement) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(StorageError::ConstraintViolation("injected failure".to_string()).into());
        }

        let mut state = self.state.lock().unwrap();
        let tx = state
            .transactions
            .get_mut(&replacement.transaction_id)
            .ok_or(ReceiptsError::NotFound)?;
        tx.eco_score = Some(replacement.eco_score.as_i16());
        tx.cashback_usd = Some(replacement.cashback_usd);
        tx.needs_receipt = false;
        state
            .items
            .insert(replacement.transaction_id, replacement.items.clone());

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Extractor with a canned answer and an optional delay.
pub struct ScriptedExtractor {
    items: Option<Vec<ReceiptLineItem>>,
    delay: Duration,
}

impl ScriptedExtractor {
    pub fn returning(items: Vec<ReceiptLineItem>) -> Self {
        Self {
            items: Some(items),
            delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            items: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl ReceiptExtractor for ScriptedExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<Vec<ReceiptLineItem>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.items
            .clone()
            .ok_or_else(|| ReceiptsError::AdapterError("scripted failure".to_string()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Footprint source returning one fixed value, or always failing.
pub struct ScriptedFootprints {
    value: Option<Decimal>,
}

impl ScriptedFootprints {
    pub fn constant(value: Decimal) -> Self {
        Self { value: Some(value) }
    }

    pub fn failing() -> Self {
        Self { value: None }
    }
}

#[async_trait::async_trait]
impl FootprintSource for ScriptedFootprints {
    async fn estimate(&self, _item: &ReceiptLineItem) -> Result<Decimal> {
        self.value
            .ok_or_else(|| ReceiptsError::AdapterError("scripted failure".to_string()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
