use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ReceiptsConfig;
use crate::models::ReceiptLineItem;
use crate::traits::ReceiptExtractor;
use crate::{ReceiptsError, Result};

use super::line_parser::parse_receipt_text;

#[derive(Debug, Clone, Serialize)]
pub struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageContent {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    pub full_text_annotation: Option<TextAnnotation>,
    pub error: Option<ApiStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub message: String,
}

/// Receipt text recognition through Google Cloud Vision `TEXT_DETECTION`.
pub struct VisionExtractor {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl VisionExtractor {
    pub fn new(endpoint: String, api_key: String, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// `None` unless recognition is switched on and has a key.
    pub fn from_config(config: &ReceiptsConfig) -> Result<Option<Self>> {
        if !config.recognition_enabled() {
            return Ok(None);
        }
        let Some(api_key) = config.google_vision_api_key.clone() else {
            return Ok(None);
        };

        Self::new(config.vision_endpoint.clone(), api_key, config.adapter_timeout).map(Some)
    }

    pub fn build_request(image: &[u8]) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(image),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION".to_string(),
                }],
            }],
        }
    }

    /// Full recognized text of the first image, erroring when the service reported
    /// a problem or found no text at all.
    pub fn recognized_text(response: AnnotateResponse) -> Result<String> {
        let first = response
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| ReceiptsError::AdapterError("Vision returned no responses".to_string()))?;

        if let Some(status) = first.error {
            return Err(ReceiptsError::AdapterError(format!(
                "Vision reported an error: {}",
                status.message
            )));
        }

        let text = first.full_text_annotation.map(|a| a.text).unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ReceiptsError::AdapterError(
                "Vision recognized no text".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait::async_trait]
impl ReceiptExtractor for VisionExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Vec<ReceiptLineItem>> {
        tracing::info!("Sending receipt image to Google Vision ({} bytes)", image.len());

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::build_request(image))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ReceiptsError::AdapterError(format!(
                "Vision API error ({}): {}",
                status, error_text
            )));
        }

        let body: AnnotateResponse = response.json().await.map_err(|e| {
            ReceiptsError::AdapterError(format!("Failed to parse Vision response: {}", e))
        })?;

        let text = Self::recognized_text(body)?;
        let items = parse_receipt_text(&text);

        tracing::info!(
            "Vision recognized {} lines, {} priced items",
            text.lines().count(),
            items.len()
        );

        Ok(items)
    }

    fn name(&self) -> &'static str {
        "google-vision"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_from(json: serde_json::Value) -> AnnotateResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_request_encodes_image_and_feature() {
        let json = serde_json::to_value(VisionExtractor::build_request(b"abc")).unwrap();

        assert_eq!(json["requests"][0]["image"]["content"], "YWJj");
        assert_eq!(json["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
    }

    #[test]
    fn test_reads_full_text_annotation() {
        let response = response_from(serde_json::json!({
            "responses": [{ "fullTextAnnotation": { "text": "Kale 3.50\nTOTAL 3.50\n" } }]
        }));

        let text = VisionExtractor::recognized_text(response).unwrap();
        assert_eq!(parse_receipt_text(&text).len(), 2);
    }

    #[test]
    fn test_missing_or_empty_text_is_an_error() {
        assert!(VisionExtractor::recognized_text(response_from(serde_json::json!({}))).is_err());
        assert!(
            VisionExtractor::recognized_text(response_from(serde_json::json!({ "responses": [{}] })))
                .is_err()
        );
        assert!(
            VisionExtractor::recognized_text(response_from(serde_json::json!({
                "responses": [{ "fullTextAnnotation": { "text": "   " } }]
            })))
            .is_err()
        );
    }

    #[test]
    fn test_service_error_is_an_error() {
        let response = response_from(serde_json::json!({
            "responses": [{ "error": { "code": 3, "message": "Bad image data." } }]
        }));

        let err = VisionExtractor::recognized_text(response).unwrap_err();
        assert!(err.to_string().contains("Bad image data."));
    }

    #[tokio::test]
    #[ignore] // Only run with a real GOOGLE_VISION_API_KEY and RECEIPT_IMAGE
    async fn test_live_recognition() {
        let config = ReceiptsConfig::from_env().unwrap();
        let extractor = VisionExtractor::from_config(&config).unwrap().unwrap();
        let image = std::fs::read(std::env::var("RECEIPT_IMAGE").unwrap()).unwrap();

        let items = extractor.extract(&image).await.unwrap();
        assert!(!items.is_empty());
    }
}
