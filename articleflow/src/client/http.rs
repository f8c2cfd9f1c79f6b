//! `reqwest` implementation of [`RequestClient`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{ClientConfig, RequestClient};
use crate::errors::{ArticleflowError, TransportError};
use crate::models::{
    ContentInput, ExcerptResult, FaqEntry, GenerationInput, ImagePrompt, ImageUpload,
    ImagesResponse, ParagraphBody, ParagraphRequest, ParagraphTopic, SeoResult, StoredAsset,
    TitleResult, TitlesInput,
};

/// HTTP client posting JSON payloads to the CMS plugin routes.
#[derive(Debug, Clone)]
pub struct HttpRequestClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpRequestClient {
    /// Builds a client from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ArticleflowError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ArticleflowError::Config(format!("invalid header name {key}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ArticleflowError::Config(format!("invalid header value for {key}: {e}")))?;
            headers.insert(name, value);
        }
        if let Some(token) = &config.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ArticleflowError::Config(format!("invalid bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| ArticleflowError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Reuses an existing [`reqwest::Client`], sharing its connection pool.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_json<B, T>(&self, route: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.url_for(route);
        debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::parse_response(response).await
    }

    /// Ensures the response has a success status code.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RequestClient for HttpRequestClient {
    async fn generate_title(&self, input: &GenerationInput) -> Result<TitleResult, TransportError> {
        self.post_json(&self.config.routes.title, input).await
    }

    async fn generate_paragraph_topics(
        &self,
        input: &GenerationInput,
    ) -> Result<Vec<ParagraphTopic>, TransportError> {
        self.post_json(&self.config.routes.paragraphs, input).await
    }

    async fn generate_paragraph_body(
        &self,
        request: &ParagraphRequest,
    ) -> Result<ParagraphBody, TransportError> {
        self.post_json(&self.config.routes.paragraph, request).await
    }

    async fn generate_excerpt(
        &self,
        input: &GenerationInput,
    ) -> Result<ExcerptResult, TransportError> {
        self.post_json(&self.config.routes.excerpt, input).await
    }

    async fn generate_seo(&self, input: &ContentInput) -> Result<SeoResult, TransportError> {
        self.post_json(&self.config.routes.seo, input).await
    }

    async fn generate_faq(&self, input: &ContentInput) -> Result<Vec<FaqEntry>, TransportError> {
        self.post_json(&self.config.routes.faq, input).await
    }

    async fn generate_images(
        &self,
        prompt: &ImagePrompt,
    ) -> Result<ImagesResponse, TransportError> {
        self.post_json(&self.config.routes.images, prompt).await
    }

    async fn generate_titles(
        &self,
        input: &TitlesInput,
    ) -> Result<Vec<TitleResult>, TransportError> {
        self.post_json(&self.config.routes.titles, input).await
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<Vec<StoredAsset>, TransportError> {
        let url = self.config.url_for(&self.config.routes.upload_image);
        debug!(%url, file_name = %upload.file_name, bytes = upload.bytes.len(), "POST multipart");

        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        Self::parse_response(response).await
    }
}
