use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ReceiptItem;

/// Where a transaction's eco score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Aggregated from processed receipt items
    Receipt,
    /// Guessed from the transaction categories
    CategoryHeuristic,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoredItemResponse {
    pub name: String,
    pub price: Option<Decimal>,
    pub qty: Option<i32>,
    pub kg_co2e: Decimal,
    pub item_score: i16,
}

impl From<ReceiptItem> for ScoredItemResponse {
    fn from(item: ReceiptItem) -> Self {
        Self {
            name: item.name,
            price: item.price,
            qty: item.qty,
            kg_co2e: item.kg_co2e,
            item_score: item.item_score,
        }
    }
}

/// Eco view of a single transaction
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EcoSummaryResponse {
    pub transaction_id: i64,
    pub amount: Decimal,
    pub eco_score: u8,
    pub cashback_usd: String,
    pub source: ScoreSource,
    pub needs_receipt: bool,
    /// Set for large general stores, where only a receipt tells what was bought
    pub receipt_recommended: bool,
    pub items: Vec<ScoredItemResponse>,
}
