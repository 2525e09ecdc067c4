use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{EmbeddingExtractor, NoseDetector, NoseRegion};
use crate::domain::{DomainError, EmbeddingVector};

/// Environment variable holding the bearer token for the model endpoints.
pub const MODEL_TOKEN_ENV: &str = "NOSEPRINT_MODEL_TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct ImageRequest {
    data: Vec<String>,
    fn_index: u32,
}

/// Accepted response bodies: a bare vector, `{"embedding": [...]}`, or a
/// Gradio-style `{"data": [[...]]}` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Bare(Vec<f32>),
    Keyed { embedding: Vec<f32> },
    Wrapped { data: Vec<Vec<f32>> },
}

impl EmbeddingResponse {
    fn into_values(self) -> Option<Vec<f32>> {
        match self {
            EmbeddingResponse::Bare(values) => Some(values),
            EmbeddingResponse::Keyed { embedding } => Some(embedding),
            EmbeddingResponse::Wrapped { data } => data.into_iter().next(),
        }
    }
}

#[derive(Deserialize)]
struct DetectionResponse {
    detected: bool,
    #[serde(default)]
    bbox: Option<[f32; 4]>,
    #[serde(default)]
    confidence: f32,
    /// Base64 muzzle crop, bare or as a data URI.
    #[serde(default)]
    cropped_image: Option<String>,
}

fn decode_crop(encoded: &str) -> Result<Vec<u8>, DomainError> {
    let payload = match encoded.split_once(";base64,") {
        Some((_, payload)) => payload,
        None => encoded,
    };
    STANDARD
        .decode(payload.trim())
        .map_err(|e| DomainError::extraction(format!("Detector returned an invalid crop: {}", e)))
}

fn data_uri(image: &[u8]) -> String {
    let mime = if image.starts_with(b"\x89PNG") {
        "image/png"
    } else {
        "image/jpeg"
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(image))
}

/// HTTP client for the remote nose-print embedding model.
///
/// Transport errors, non-2xx statuses and malformed bodies surface as
/// `ExtractionFailed`; a vector of the wrong length or zero norm keeps its
/// own error. The client does not retry and never fabricates a vector.
pub struct RemoteModelClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl RemoteModelClient {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url: url.into(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Reads the bearer token from `NOSEPRINT_MODEL_TOKEN`.
    pub fn from_env(url: impl Into<String>) -> Self {
        Self::new(url, std::env::var(MODEL_TOKEN_ENV).ok())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post_image<T: DeserializeOwned>(&self, image: &[u8]) -> Result<T, DomainError> {
        let request = ImageRequest {
            data: vec![data_uri(image)],
            fn_index: 0,
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DomainError::extraction(format!("Model request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Model endpoint {} returned {}: {}", self.url, status, body);
            return Err(DomainError::extraction(format!(
                "Model endpoint returned {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::extraction(format!("Malformed model response: {}", e)))
    }
}

#[async_trait]
impl EmbeddingExtractor for RemoteModelClient {
    async fn extract(&self, image: &[u8]) -> Result<EmbeddingVector, DomainError> {
        let response: EmbeddingResponse = self.post_image(image).await?;
        let values = response
            .into_values()
            .ok_or_else(|| DomainError::extraction("Model response carried no embedding"))?;

        debug!("Model returned {} values", values.len());
        EmbeddingVector::new(values).map_err(|e| {
            warn!("Model at {} returned an unusable vector: {}", self.url, e);
            e
        })
    }

    fn name(&self) -> &str {
        "remote-model"
    }
}

/// Nose detector served by a separate endpoint of the same model host.
pub struct RemoteNoseDetector {
    inner: RemoteModelClient,
}

impl RemoteNoseDetector {
    pub fn new(client: RemoteModelClient) -> Self {
        Self { inner: client }
    }
}

#[async_trait]
impl NoseDetector for RemoteNoseDetector {
    async fn detect(&self, image: &[u8]) -> Result<Option<NoseRegion>, DomainError> {
        let response: DetectionResponse = self.inner.post_image(image).await?;
        if !response.detected {
            return Ok(None);
        }
        let bbox = response
            .bbox
            .ok_or_else(|| DomainError::extraction("Detector reported a nose without a bounding box"))?;

        let crop = response
            .cropped_image
            .as_deref()
            .map(decode_crop)
            .transpose()?;

        Ok(Some(NoseRegion {
            bbox,
            confidence: response.confidence,
            crop,
        }))
    }
}
