use std::time::Duration;

use crate::{ReceiptsError, Result};

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const DEFAULT_CLIMATIQ_ENDPOINT: &str = "https://api.climatiq.io/data/v1/estimate";
pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(20);

/// Settings for the remote adapters. Passed to each adapter at construction.
#[derive(Debug, Clone)]
pub struct ReceiptsConfig {
    pub enable_real_recognition: bool,
    pub enable_real_footprint_service: bool,
    pub google_vision_api_key: Option<String>,
    pub climatiq_api_key: Option<String>,
    pub vision_endpoint: String,
    pub climatiq_endpoint: String,
    pub adapter_timeout: Duration,
}

impl Default for ReceiptsConfig {
    fn default() -> Self {
        Self {
            enable_real_recognition: false,
            enable_real_footprint_service: false,
            google_vision_api_key: None,
            climatiq_api_key: None,
            vision_endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            climatiq_endpoint: DEFAULT_CLIMATIQ_ENDPOINT.to_string(),
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
        }
    }
}

impl ReceiptsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let adapter_timeout = match non_empty(lookup("ADAPTER_TIMEOUT_SECS")) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ReceiptsError::ConfigError(format!(
                        "ADAPTER_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                if secs == 0 {
                    return Err(ReceiptsError::ConfigError(
                        "ADAPTER_TIMEOUT_SECS must be at least 1".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.adapter_timeout,
        };

        Ok(Self {
            enable_real_recognition: parse_flag(lookup("USE_REAL_OCR")),
            enable_real_footprint_service: parse_flag(lookup("USE_REAL_CLIMATIQ")),
            google_vision_api_key: non_empty(lookup("GOOGLE_VISION_API_KEY")),
            climatiq_api_key: non_empty(lookup("CLIMATIQ_API_KEY")),
            vision_endpoint: non_empty(lookup("VISION_ENDPOINT")).unwrap_or(defaults.vision_endpoint),
            climatiq_endpoint: non_empty(lookup("CLIMATIQ_ENDPOINT"))
                .unwrap_or(defaults.climatiq_endpoint),
            adapter_timeout,
        })
    }

    /// The recognition adapter is used only when switched on and given a key.
    pub fn recognition_enabled(&self) -> bool {
        self.enable_real_recognition && self.google_vision_api_key.is_some()
    }

    pub fn footprint_service_enabled(&self) -> bool {
        self.enable_real_footprint_service && self.climatiq_api_key.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: Option<String>) -> bool {
    matches!(
        non_empty(value).map(|v| v.to_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
