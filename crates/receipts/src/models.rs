use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Name given to a line when nothing better could be read from the receipt.
pub const UNKNOWN_ITEM_NAME: &str = "Unknown Item";

/// One candidate line read off a receipt, before any scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLineItem {
    pub name: String,
    pub price: Option<Decimal>,
    pub qty: Option<i32>,
}

impl ReceiptLineItem {
    /// Builds an item, falling back to the sentinel name when `name` is blank.
    pub fn new(name: impl Into<String>, price: Option<Decimal>, qty: Option<i32>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            UNKNOWN_ITEM_NAME.to_string()
        } else {
            name
        };

        Self {
            name,
            price,
            qty: qty.filter(|q| *q > 0),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ITEM_NAME, None, None)
    }
}
