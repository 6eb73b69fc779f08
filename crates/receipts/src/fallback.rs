use std::time::Duration;

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::ReceiptLineItem;
use crate::traits::{FootprintSource, ReceiptExtractor};
use crate::{ReceiptsError, Result};

/// Runs `primary` under a deadline and answers from `fallback` whenever it
/// errors, times out or returns something unusable.
///
/// For extraction "unusable" means no items; for footprints it means a
/// negative value. The wrapped adapter therefore never surfaces its own
/// failures, only the fallback's (which are infallible in practice).
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
    timeout: Duration,
}

impl<P, F> WithFallback<P, F> {
    pub fn new(primary: P, fallback: F, timeout: Duration) -> Self {
        Self {
            primary,
            fallback,
            timeout,
        }
    }

    async fn run_primary<T, Fut>(&self, adapter: &'static str, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ReceiptsError::AdapterError(format!(
                "{} timed out after {:?}",
                adapter, self.timeout
            ))),
        }
    }
}

#[async_trait::async_trait]
impl<P, F> ReceiptExtractor for WithFallback<P, F>
where
    P: ReceiptExtractor,
    F: ReceiptExtractor,
{
    async fn extract(&self, image: &[u8]) -> Result<Vec<ReceiptLineItem>> {
        let adapter = self.primary.name();
        match self.run_primary(adapter, self.primary.extract(image)).await {
            Ok(items) if !items.is_empty() => return Ok(items),
            Ok(_) => warn!("{} found no priced lines, using {}", adapter, self.fallback.name()),
            Err(e) => warn!("{} failed ({}), using {}", adapter, e, self.fallback.name()),
        }

        self.fallback.extract(image).await
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}

#[async_trait::async_trait]
impl<P, F> FootprintSource for WithFallback<P, F>
where
    P: FootprintSource,
    F: FootprintSource,
{
    async fn estimate(&self, item: &ReceiptLineItem) -> Result<Decimal> {
        let adapter = self.primary.name();
        match self.run_primary(adapter, self.primary.estimate(item)).await {
            Ok(kg) if kg >= Decimal::ZERO => return Ok(kg),
            Ok(kg) => warn!(
                "{} returned negative footprint {} for '{}', using {}",
                adapter,
                kg,
                item.name,
                self.fallback.name()
            ),
            Err(e) => warn!(
                "{} failed for '{}' ({}), using {}",
                adapter,
                item.name,
                e,
                self.fallback.name()
            ),
        }

        self.fallback.estimate(item).await
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::FallbackExtractor;
    use crate::footprint::FactorTableEstimator;
    use crate::models::UNKNOWN_ITEM_NAME;
    use crate::test_utils::{ScriptedExtractor, ScriptedFootprints};
    use std::str::FromStr;

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_extractor_passes_through_items() {
        let items = vec![ReceiptLineItem::new("Kale", Some(Decimal::new(350, 2)), None)];
        let extractor = WithFallback::new(
            ScriptedExtractor::returning(items.clone()),
            FallbackExtractor,
            TIMEOUT,
        );

        assert_eq!(extractor.extract(b"img").await.unwrap(), items);
    }

    #[tokio::test]
    async fn test_extractor_failure_uses_fallback() {
        let extractor = WithFallback::new(ScriptedExtractor::failing(), FallbackExtractor, TIMEOUT);

        let items = extractor.extract(b"img").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, UNKNOWN_ITEM_NAME);
    }

    #[tokio::test]
    async fn test_extractor_empty_result_uses_fallback() {
        let extractor = WithFallback::new(
            ScriptedExtractor::returning(Vec::new()),
            FallbackExtractor,
            TIMEOUT,
        );

        assert_eq!(extractor.extract(b"img").await.unwrap(), vec![ReceiptLineItem::unknown()]);
    }

    #[tokio::test]
    async fn test_extractor_timeout_uses_fallback() {
        let extractor = WithFallback::new(
            ScriptedExtractor::returning(vec![ReceiptLineItem::new("Slow", None, None)])
                .with_delay(Duration::from_secs(30)),
            FallbackExtractor,
            Duration::from_millis(20),
        );

        assert_eq!(extractor.extract(b"img").await.unwrap(), vec![ReceiptLineItem::unknown()]);
    }

    #[tokio::test]
    async fn test_footprint_failure_uses_factor_table() {
        let source = WithFallback::new(ScriptedFootprints::failing(), FactorTableEstimator, TIMEOUT);
        let item = ReceiptLineItem::new("Ground beef", Some(Decimal::new(10, 0)), None);

        assert_eq!(source.estimate(&item).await.unwrap(), Decimal::from_str("50").unwrap());
    }

    #[tokio::test]
    async fn test_footprint_negative_value_uses_factor_table() {
        let source = WithFallback::new(
            ScriptedFootprints::constant(Decimal::new(-1, 0)),
            FactorTableEstimator,
            TIMEOUT,
        );
        let item = ReceiptLineItem::new("Paperback book", Some(Decimal::new(10, 0)), None);

        assert_eq!(source.estimate(&item).await.unwrap(), Decimal::new(2, 0));
    }

    #[tokio::test]
    async fn test_footprint_success_passes_through() {
        let source = WithFallback::new(
            ScriptedFootprints::constant(Decimal::new(42, 1)),
            FactorTableEstimator,
            TIMEOUT,
        );
        let item = ReceiptLineItem::new("Anything", None, None);

        assert_eq!(source.estimate(&item).await.unwrap(), Decimal::new(42, 1));
    }
}
