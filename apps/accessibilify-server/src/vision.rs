//! Vision-service client
//!
//! The label-detection service is an external collaborator. Handlers only see
//! the [`LabelDetector`] trait so tests can swap in a canned detector.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use shared_types::DetectedLabel;
use thiserror::Error;
use tracing::debug;

/// Labels requested per image
pub const MAX_LABELS: u32 = 100;

/// Minimum confidence the service should report
pub const MIN_CONFIDENCE: f64 = 20.0;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Invalid frame data: {0}")]
    InvalidImage(String),

    #[error("Vision request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Vision service returned {status}: {body}")]
    Upstream { status: u16, body: String },
}

#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Detect labels in one encoded image
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<DetectedLabel>, VisionError>;
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DetectLabelsRequest {
    image: ImagePayload,
    max_labels: u32,
    min_confidence: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ImagePayload {
    bytes: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectLabelsResponse {
    #[serde(default)]
    labels: Vec<DetectedLabel>,
}

/// Posts frames to an HTTP label-detection endpoint
#[derive(Debug, Clone)]
pub struct HttpLabelDetector {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLabelDetector {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, VisionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LabelDetector for HttpLabelDetector {
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<DetectedLabel>, VisionError> {
        let request = DetectLabelsRequest {
            image: ImagePayload {
                bytes: BASE64.encode(image),
            },
            max_labels: MAX_LABELS,
            min_confidence: MIN_CONFIDENCE,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: DetectLabelsResponse = response.json().await?;
        debug!(labels = parsed.labels.len(), bytes = image.len(), "Vision labels received");
        Ok(parsed.labels)
    }
}

/// Decode a frame sent as base64, optionally wrapped in a `data:image/...` URL
pub fn decode_frame_data(frame_data: &str) -> Result<Vec<u8>, VisionError> {
    let encoded = match frame_data.strip_prefix("data:") {
        Some(url) => url
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| VisionError::InvalidImage("expected a base64 data URL".to_string()))?,
        None => frame_data,
    };

    BASE64
        .decode(encoded.trim())
        .map_err(|e| VisionError::InvalidImage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_plain_base64() {
        assert_eq!(decode_frame_data("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_frame_data("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_frame_data("data:image/png,raw"),
            Err(VisionError::InvalidImage(_))
        ));
        assert!(matches!(
            decode_frame_data("not base64!"),
            Err(VisionError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_request_wire_format() {
        let request = DetectLabelsRequest {
            image: ImagePayload {
                bytes: "AAAA".to_string(),
            },
            max_labels: MAX_LABELS,
            min_confidence: MIN_CONFIDENCE,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"Image": {"Bytes": "AAAA"}, "MaxLabels": 100, "MinConfidence": 20.0})
        );
    }

    #[test]
    fn test_response_parsing() {
        let parsed: DetectLabelsResponse = serde_json::from_str(
            r#"{"Labels": [{"Name": "Stairs", "Confidence": 80.5}], "LabelModelVersion": "3.0"}"#,
        )
        .unwrap();
        assert_eq!(parsed.labels.len(), 1);
        assert_eq!(parsed.labels[0].name(), "Stairs");
    }
}
