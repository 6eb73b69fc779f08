use rust_decimal::Decimal;

use crate::Result;
use crate::models::ReceiptLineItem;

/// Turns receipt image bytes into candidate line items.
///
/// Implementations may fail or return nothing; wrap them in
/// [`WithFallback`](crate::WithFallback) to get the never-failing behavior the
/// processor relies on.
#[async_trait::async_trait]
pub trait ReceiptExtractor: Send + Sync {
    async fn extract(&self, image: &[u8]) -> Result<Vec<ReceiptLineItem>>;

    fn name(&self) -> &'static str;
}

/// Estimates the footprint of one line item in kgCO2e.
#[async_trait::async_trait]
pub trait FootprintSource: Send + Sync {
    async fn estimate(&self, item: &ReceiptLineItem) -> Result<Decimal>;

    fn name(&self) -> &'static str;
}
