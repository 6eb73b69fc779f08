use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A card transaction owned by a user. Rows are created by the ingestion side;
/// the receipt pipeline only writes the derived eco fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub external_id: Option<String>,
    pub date: NaiveDate,
    pub name: String,
    pub merchant_name: Option<String>,
    pub amount: Decimal,
    pub iso_currency_code: Option<String>,
    pub category: Option<Vec<String>>,
    pub eco_score: Option<i16>,
    pub cashback_usd: Option<Decimal>,
    pub needs_receipt: bool,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    pub fn categories(&self) -> &[String] {
        self.category.as_deref().unwrap_or_default()
    }
}
