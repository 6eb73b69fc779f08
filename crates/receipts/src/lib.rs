pub mod config;
pub mod error;
pub mod extractors;
pub mod fallback;
pub mod footprint;
pub mod models;
pub mod processor;
pub mod scorer;
pub mod store;
pub mod traits;

#[cfg(test)]
mod test_utils;

pub use config::ReceiptsConfig;
pub use error::{ReceiptsError, Result};
pub use fallback::WithFallback;
pub use models::ReceiptLineItem;
pub use processor::ReceiptProcessor;
pub use scorer::{ReceiptScorer, ScanReport};
pub use store::TransactionStore;
pub use traits::{FootprintSource, ReceiptExtractor};
