mod eco_score;
mod receipt_item;
mod transaction;

pub use eco_score::EcoScore;
pub use receipt_item::{
    MAX_ITEM_PRICE, MAX_KG_CO2E, NewReceiptItem, ReceiptItem, ReceiptReplacement,
};
pub use transaction::Transaction;
