//! Image generation and upload records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prompt context for image generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePrompt {
    /// Text prompt describing the image.
    pub prompt: String,
    /// Number of candidates to request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u8>,
    /// Requested size, e.g. "1024x1024".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl ImagePrompt {
    /// Creates a prompt with backend defaults for count and size.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            n: None,
            size: None,
        }
    }

    /// Sets the number of candidates.
    #[must_use]
    pub fn with_count(mut self, n: u8) -> Self {
        self.n = Some(n);
        self
    }

    /// Sets the image size.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

/// One generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ImageCandidate {
    /// Base64-encoded PNG payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
    /// Provider-hosted URL, when the provider returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Prompt as rewritten by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

impl ImageCandidate {
    /// Creates a candidate from a base64 payload.
    #[must_use]
    pub fn from_base64(payload: impl Into<String>) -> Self {
        Self {
            b64_json: Some(payload.into()),
            ..Default::default()
        }
    }

    /// Returns true if the candidate carries an embedded payload.
    #[must_use]
    pub fn has_payload(&self) -> bool {
        self.b64_json.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// `data:` URI for previewing the embedded payload.
    #[must_use]
    pub fn data_uri(&self) -> Option<String> {
        self.b64_json
            .as_ref()
            .map(|p| format!("data:image/png;base64,{p}"))
    }
}

/// Response of the image generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ImagesResponse {
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,
    /// Candidates in provider order.
    #[serde(default)]
    pub data: Vec<ImageCandidate>,
}

/// Binary image handed to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent with the upload.
    pub file_name: String,
    /// MIME type of the bytes.
    pub mime: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

/// Asset reference returned by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAsset {
    /// Storage identifier.
    pub id: u64,
    /// Stored file name.
    pub name: String,
    /// Public URL of the asset.
    pub url: String,
    /// MIME type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    /// Size as reported by storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Any other fields the storage returned.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
