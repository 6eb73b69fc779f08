use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Identifiers sent alongside an uploaded receipt image
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UploadReceiptRequest {
    #[validate(range(min = 1, message = "user_id must be >= 1"))]
    pub user_id: i64,
    #[validate(range(min = 1, message = "transaction_id must be >= 1"))]
    pub transaction_id: i64,
}

/// Result of processing one receipt upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadReceiptResponse {
    pub transaction_id: i64,
    pub eco_score: u8,
    /// Cashback in dollars, always with two decimals
    #[serde(rename = "cashback_usd")]
    pub cashback_amount: String,
    #[serde(rename = "items")]
    pub item_count: usize,
}
