use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::EcoScore;

/// Largest value `receipt_items.price NUMERIC(12,2)` holds: 9,999,999,999.99.
pub const MAX_ITEM_PRICE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Largest value `receipt_items.kg_co2e NUMERIC(16,6)` holds: 9,999,999,999.999999.
pub const MAX_KG_CO2E: Decimal = Decimal::from_parts(0x6FC0_FFFF, 0x0023_86F2, 0, false, 6);

/// A scored receipt line persisted against its transaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReceiptItem {
    pub id: i64,
    pub transaction_id: i64,
    pub name: String,
    pub price: Option<Decimal>,
    pub qty: Option<i32>,
    pub kg_co2e: Decimal,
    pub item_score: i16,
    pub created_at: NaiveDateTime,
}

/// A scored line that has not been written yet.
///
/// `kg_co2e` is never optional and `item_score` can only hold 0..=10, so a row
/// built from this type always satisfies the table constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReceiptItem {
    pub name: String,
    pub price: Option<Decimal>,
    pub qty: Option<i32>,
    pub kg_co2e: Decimal,
    pub item_score: EcoScore,
}

/// Everything written in the single commit that reprocesses a receipt.
#[derive(Debug, Clone)]
pub struct ReceiptReplacement {
    pub transaction_id: i64,
    pub items: Vec<NewReceiptItem>,
    pub eco_score: EcoScore,
    pub cashback_usd: Decimal,
}
