//! Google Gemini `generateContent` provider.
//!
//! The frame is shipped as an inline base64 JPEG together with a fixed
//! instruction, and the model is asked for structured JSON of the form
//! `{"box": [ymin, xmin, ymax, xmax]}`.

use std::time::Duration;

use base64::Engine;
use facesnap_common::config::AiConfig;
use facesnap_common::error::{FaceSnapError, FaceSnapResult};
use facesnap_region_model::raster::RasterImage;
use facesnap_region_model::region::NormalizedRegion;
use serde::{Deserialize, Serialize};

use crate::boxes::BoxConvention;
use crate::proposer::RegionProposer;

/// Instruction sent alongside the frame.
pub const DETECTION_PROMPT: &str = "Detect the most prominent human face in this image. \
Return the normalized bounding box coordinates as [ymin, xmin, ymax, xmax]. \
If no face is found, return null.";

/// Region proposer backed by a Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiProposer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    convention: BoxConvention,
    transport_quality: f64,
}

impl GeminiProposer {
    /// Build a proposer from config, reading the API key from the
    /// environment.
    pub fn from_config(config: &AiConfig) -> FaceSnapResult<Self> {
        Self::with_api_key(config, config.api_key())
    }

    /// Build a proposer with an explicit API key.
    pub fn with_api_key(config: &AiConfig, api_key: Option<String>) -> FaceSnapResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| FaceSnapError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            convention: BoxConvention::from_config(config),
            transport_quality: config.transport_quality,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// `{endpoint}/models/{model}:generateContent`
    pub fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    async fn detect(&self, frame: &RasterImage) -> FaceSnapResult<Option<NormalizedRegion>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FaceSnapError::detection("No API key configured"))?;

        let jpeg = facesnap_render_engine::encode_jpeg(frame, self.transport_quality)?;
        let body = build_request(&jpeg);

        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| FaceSnapError::detection(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FaceSnapError::detection(format!(
                "Provider returned {status}: {}",
                detail.trim()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FaceSnapError::detection(format!("Malformed response: {e}")))?;

        let raw = parse_box(&parsed)?;
        Ok(raw.and_then(|b| self.convention.to_region_from_slice(&b)))
    }
}

#[async_trait::async_trait]
impl RegionProposer for GeminiProposer {
    async fn propose(&self, frame: &RasterImage) -> Option<NormalizedRegion> {
        match self.detect(frame).await {
            Ok(Some(region)) => {
                tracing::info!(%region, model = %self.model, "Face region proposed");
                Some(region)
            }
            Ok(None) => {
                tracing::info!(model = %self.model, "No face found");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, "AI face detection failed");
                None
            }
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct BoxAnswer {
    #[serde(rename = "box")]
    bbox: Option<Vec<f64>>,
}

/// Request body carrying `jpeg` and the detection prompt.
pub fn build_request(jpeg: &[u8]) -> GenerateContentRequest {
    let data = base64::engine::general_purpose::STANDARD.encode(jpeg);
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/jpeg".to_string(),
                        data,
                    }),
                },
                Part {
                    text: Some(DETECTION_PROMPT.to_string()),
                    inline_data: None,
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: serde_json::json!({
                "type": "OBJECT",
                "properties": {
                    "box": {
                        "type": "ARRAY",
                        "items": { "type": "NUMBER" },
                        "description": "[ymin, xmin, ymax, xmax] normalized 0-1000"
                    }
                }
            }),
        },
    }
}

/// Extract the raw box from a response.
///
/// `Ok(None)` means the model answered but found no face.
pub fn parse_box(response: &GenerateContentResponse) -> FaceSnapResult<Option<Vec<f64>>> {
    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.iter().find_map(|p| p.text.as_deref()))
        .ok_or_else(|| FaceSnapError::detection("Response has no text part"))?;

    let text = text.trim();
    if text.is_empty() || text == "null" {
        return Ok(None);
    }

    let answer: BoxAnswer = serde_json::from_str(text)
        .map_err(|e| FaceSnapError::detection(format!("Unparseable answer {text:?}: {e}")))?;
    Ok(answer.bbox)
}
