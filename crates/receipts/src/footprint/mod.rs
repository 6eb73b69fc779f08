pub mod climatiq_client;
pub mod factor_table;

pub use climatiq_client::ClimatiqClient;

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::config::ReceiptsConfig;
use crate::fallback::WithFallback;
use crate::models::ReceiptLineItem;
use crate::traits::FootprintSource;
use crate::Result;

/// Deterministic spend-based estimator backed by the keyword factor table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorTableEstimator;

#[async_trait::async_trait]
impl FootprintSource for FactorTableEstimator {
    async fn estimate(&self, item: &ReceiptLineItem) -> Result<Decimal> {
        Ok(factor_table::estimate_footprint(&item.name, item.price))
    }

    fn name(&self) -> &'static str {
        "factor-table"
    }
}

/// The footprint source selected by `config`: Climatiq behind the factor table
/// fallback when enabled, the factor table alone otherwise.
pub fn build_footprint_source(config: &ReceiptsConfig) -> Result<Arc<dyn FootprintSource>> {
    match ClimatiqClient::from_config(config)? {
        Some(client) => {
            tracing::info!("Using Climatiq footprint service with factor table fallback");
            Ok(Arc::new(WithFallback::new(
                client,
                FactorTableEstimator,
                config.adapter_timeout,
            )))
        }
        None => {
            tracing::info!("Using factor table footprint estimates");
            Ok(Arc::new(FactorTableEstimator))
        }
    }
}
