pub mod receipts;
pub mod transactions;
