pub mod line_parser;
pub mod vision_client;

pub use line_parser::parse_receipt_text;
pub use vision_client::VisionExtractor;

use std::sync::Arc;

use crate::config::ReceiptsConfig;
use crate::fallback::WithFallback;
use crate::models::ReceiptLineItem;
use crate::traits::ReceiptExtractor;
use crate::Result;

/// Stand-in used when recognition is off or fails: a single unpriced "Unknown Item".
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackExtractor;

#[async_trait::async_trait]
impl ReceiptExtractor for FallbackExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<Vec<ReceiptLineItem>> {
        Ok(vec![ReceiptLineItem::unknown()])
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

/// The extractor selected by `config`: Google Vision behind the fallback when
/// enabled, the fallback alone otherwise.
pub fn build_extractor(config: &ReceiptsConfig) -> Result<Arc<dyn ReceiptExtractor>> {
    match VisionExtractor::from_config(config)? {
        Some(vision) => {
            tracing::info!("Using Google Vision receipt recognition with fallback");
            Ok(Arc::new(WithFallback::new(
                vision,
                FallbackExtractor,
                config.adapter_timeout,
            )))
        }
        None => {
            tracing::info!("Receipt recognition disabled, using fallback extractor");
            Ok(Arc::new(FallbackExtractor))
        }
    }
}
