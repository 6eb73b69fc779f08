use std::sync::Arc;

use receipts::ReceiptProcessor;
use storage::Database;

/// Shared by every handler. The processor is shared so that its per-transaction
/// locks cover all requests.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub processor: Arc<ReceiptProcessor>,
}

impl AppState {
    pub fn new(db: Database, processor: ReceiptProcessor) -> Self {
        Self {
            db,
            processor: Arc::new(processor),
        }
    }
}
