//! Request client seam.
//!
//! [`RequestClient`] is the one collaborator the workflows talk to. Each
//! method is a single request/response round trip; transport concerns
//! (encoding, auth, headers) stay behind the trait.

mod config;
#[cfg(feature = "http")]
mod http;

pub use config::{ClientConfig, RouteTable};
#[cfg(feature = "http")]
pub use http::HttpRequestClient;

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::models::{
    ContentInput, ExcerptResult, FaqEntry, GenerationInput, ImagePrompt, ImageUpload,
    ImagesResponse, ParagraphBody, ParagraphRequest, ParagraphTopic, SeoResult, StoredAsset,
    TitleResult, TitlesInput,
};

/// Logical operations offered by the content backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestClient: Send + Sync {
    /// generate-title
    async fn generate_title(&self, input: &GenerationInput) -> Result<TitleResult, TransportError>;

    /// generate-paragraph-topics
    async fn generate_paragraph_topics(
        &self,
        input: &GenerationInput,
    ) -> Result<Vec<ParagraphTopic>, TransportError>;

    /// generate-paragraph-body
    async fn generate_paragraph_body(
        &self,
        request: &ParagraphRequest,
    ) -> Result<ParagraphBody, TransportError>;

    /// generate-excerpt
    async fn generate_excerpt(
        &self,
        input: &GenerationInput,
    ) -> Result<ExcerptResult, TransportError>;

    /// generate-seo
    async fn generate_seo(&self, input: &ContentInput) -> Result<SeoResult, TransportError>;

    /// generate-faq
    async fn generate_faq(&self, input: &ContentInput) -> Result<Vec<FaqEntry>, TransportError>;

    /// generate-images
    async fn generate_images(&self, prompt: &ImagePrompt)
        -> Result<ImagesResponse, TransportError>;

    /// generate-titles, used by batch runs.
    async fn generate_titles(&self, input: &TitlesInput)
        -> Result<Vec<TitleResult>, TransportError>;

    /// upload-image
    async fn upload_image(&self, upload: ImageUpload) -> Result<Vec<StoredAsset>, TransportError>;
}
