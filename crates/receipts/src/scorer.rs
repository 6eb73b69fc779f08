use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use storage::models::{EcoScore, MAX_ITEM_PRICE, MAX_KG_CO2E, NewReceiptItem};
use storage::services::eco_scoring;
use tracing::{debug, warn};

use crate::config::ReceiptsConfig;
use crate::extractors::build_extractor;
use crate::footprint::{build_footprint_source, factor_table};
use crate::models::ReceiptLineItem;
use crate::traits::{FootprintSource, ReceiptExtractor};
use crate::Result;

/// Scored items of one receipt and their aggregate, before anything is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub items: Vec<NewReceiptItem>,
    pub eco_score: EcoScore,
}

/// Extraction and scoring without persistence.
#[derive(Clone)]
pub struct ReceiptScorer {
    extractor: Arc<dyn ReceiptExtractor>,
    footprints: Arc<dyn FootprintSource>,
}

impl ReceiptScorer {
    pub fn new(extractor: Arc<dyn ReceiptExtractor>, footprints: Arc<dyn FootprintSource>) -> Self {
        Self {
            extractor,
            footprints,
        }
    }

    pub fn from_config(config: &ReceiptsConfig) -> Result<Self> {
        Ok(Self::new(
            build_extractor(config)?,
            build_footprint_source(config)?,
        ))
    }

    /// Candidate items for an image. An extractor error is logged and read as "no items".
    pub async fn extract(&self, image: &[u8]) -> Vec<ReceiptLineItem> {
        match self.extractor.extract(image).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Extractor {} failed: {}", self.extractor.name(), e);
                Vec::new()
            }
        }
    }

    /// Footprint in kgCO2e for one item, at storage precision. Never absent,
    /// never negative and never above what a receipt item row can hold.
    pub async fn footprint(&self, item: &ReceiptLineItem) -> Decimal {
        let kg = match self.footprints.estimate(item).await {
            Ok(kg) if kg >= Decimal::ZERO => kg,
            Ok(kg) => {
                warn!("Negative footprint {} for '{}', using factor table", kg, item.name);
                factor_table::estimate_footprint(&item.name, item.price)
            }
            Err(e) => {
                warn!("Footprint for '{}' failed ({}), using factor table", item.name, e);
                factor_table::estimate_footprint(&item.name, item.price)
            }
        }
        .round_dp(6);

        if kg > MAX_KG_CO2E {
            warn!("Footprint {} for '{}' is out of range, capping", kg, item.name);
            return MAX_KG_CO2E;
        }
        kg
    }

    /// Estimates every item concurrently and scores it; output order follows input order.
    pub async fn score_items(&self, items: &[ReceiptLineItem]) -> Vec<NewReceiptItem> {
        let items: Vec<ReceiptLineItem> = items.iter().map(storable).collect();
        let footprints = join_all(items.iter().map(|item| self.footprint(item))).await;

        items
            .iter()
            .zip(footprints)
            .map(|(item, kg_co2e)| {
                let item_score = eco_scoring::score_item(kg_co2e, item.price);
                debug!(
                    "Scored '{}': price={:?} kg_co2e={} score={}",
                    item.name, item.price, kg_co2e, item_score
                );
                NewReceiptItem {
                    name: item.name.clone(),
                    price: item.price,
                    qty: item.qty,
                    kg_co2e,
                    item_score,
                }
            })
            .collect()
    }

    /// Extracts, scores and aggregates a receipt image.
    pub async fn scan(&self, image: &[u8]) -> ScanReport {
        let items = self.extract(image).await;
        let items = self.score_items(&items).await;
        let eco_score = aggregate(&items);

        ScanReport { items, eco_score }
    }
}

/// Drops a price too large for the item table; the item is then scored as unpriced.
fn storable(item: &ReceiptLineItem) -> ReceiptLineItem {
    match item.price {
        Some(price) if price > MAX_ITEM_PRICE => {
            warn!("Price {} for '{}' is out of range, treating as unpriced", price, item.name);
            ReceiptLineItem {
                price: None,
                ..item.clone()
            }
        }
        _ => item.clone(),
    }
}

pub fn aggregate(items: &[NewReceiptItem]) -> EcoScore {
    eco_scoring::aggregate_transaction_score(items.iter().map(|i| (i.price, i.item_score)))
}
