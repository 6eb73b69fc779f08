use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use storage::models::MAX_KG_CO2E;

use crate::config::ReceiptsConfig;
use crate::models::ReceiptLineItem;
use crate::traits::FootprintSource;
use crate::{ReceiptsError, Result};

const DATA_VERSION: &str = "^21";

/// Keyword to Climatiq spend-based activity, first match wins like the factor table.
const ACTIVITY_IDS: &[(&str, &str)] = &[
    ("beef", "consumer_goods-type_meat_products_beef"),
    ("pork", "consumer_goods-type_meat_products_pork"),
    ("chicken", "consumer_goods-type_meat_products_poultry"),
    ("coffee", "consumer_goods-type_coffee_tea"),
    ("bread", "consumer_goods-type_bakery_products"),
    ("rice", "consumer_goods-type_grain_mill_products"),
    ("shirt", "consumer_goods-type_clothing"),
    ("electronics", "consumer_goods-type_consumer_electronics"),
    ("book", "consumer_goods-type_books"),
    ("toy", "consumer_goods-type_games_toys"),
];

#[derive(Debug, Clone, Serialize)]
pub struct EstimateRequest {
    pub emission_factor: EmissionFactorSelector,
    pub parameters: SpendParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmissionFactorSelector {
    pub activity_id: String,
    pub data_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpendParameters {
    #[serde(with = "rust_decimal::serde::float")]
    pub money: Decimal,
    pub money_unit: String,
}

#[derive(Debug, Deserialize)]
pub struct EstimateResponse {
    pub co2e: f64,
    pub co2e_unit: String,
}

/// Activity used for an item name, if any keyword maps to one.
pub fn activity_for(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    ACTIVITY_IDS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, activity)| *activity)
}

/// Spend-based estimates from the Climatiq API.
///
/// Items without a price or without a mapped activity are reported as errors so
/// the caller's fallback handles them.
pub struct ClimatiqClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ClimatiqClient {
    pub fn new(endpoint: String, api_key: String, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// `None` unless the footprint service is switched on and has a key.
    pub fn from_config(config: &ReceiptsConfig) -> Result<Option<Self>> {
        if !config.footprint_service_enabled() {
            return Ok(None);
        }
        let Some(api_key) = config.climatiq_api_key.clone() else {
            return Ok(None);
        };

        Self::new(config.climatiq_endpoint.clone(), api_key, config.adapter_timeout).map(Some)
    }

    pub fn build_request(item: &ReceiptLineItem) -> Result<EstimateRequest> {
        let activity_id = activity_for(&item.name).ok_or_else(|| {
            ReceiptsError::AdapterError(format!("no Climatiq activity for '{}'", item.name))
        })?;
        let money = item
            .price
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| {
                ReceiptsError::AdapterError(format!("'{}' has no price to estimate from", item.name))
            })?;

        Ok(EstimateRequest {
            emission_factor: EmissionFactorSelector {
                activity_id: activity_id.to_string(),
                data_version: DATA_VERSION.to_string(),
            },
            parameters: SpendParameters {
                money,
                money_unit: "usd".to_string(),
            },
        })
    }

    /// Converts the response to kgCO2e, rejecting anything that is not a finite,
    /// non-negative kg value a receipt item row can hold.
    pub fn parse_response(response: EstimateResponse) -> Result<Decimal> {
        if !response.co2e_unit.eq_ignore_ascii_case("kg") {
            return Err(ReceiptsError::AdapterError(format!(
                "unexpected co2e unit '{}'",
                response.co2e_unit
            )));
        }
        if !response.co2e.is_finite() || response.co2e < 0.0 {
            return Err(ReceiptsError::AdapterError(format!(
                "invalid co2e value {}",
                response.co2e
            )));
        }

        Decimal::from_f64(response.co2e)
            .map(|kg| kg.round_dp(6))
            .filter(|kg| *kg <= MAX_KG_CO2E)
            .ok_or_else(|| {
                ReceiptsError::AdapterError(format!("co2e {} out of range", response.co2e))
            })
    }
}

#[async_trait::async_trait]
impl FootprintSource for ClimatiqClient {
    async fn estimate(&self, item: &ReceiptLineItem) -> Result<Decimal> {
        let request = Self::build_request(item)?;

        tracing::debug!(
            "Requesting Climatiq estimate for '{}' ({})",
            item.name,
            request.emission_factor.activity_id
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ReceiptsError::AdapterError(format!(
                "Climatiq API error ({}): {}",
                status, error_text
            )));
        }

        let body: EstimateResponse = response.json().await.map_err(|e| {
            ReceiptsError::AdapterError(format!("Failed to parse Climatiq response: {}", e))
        })?;

        Self::parse_response(body)
    }

    fn name(&self) -> &'static str {
        "climatiq"
    }
}
