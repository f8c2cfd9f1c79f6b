//! Scripted request client for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::client::RequestClient;
use crate::errors::TransportError;
use crate::models::{
    ContentInput, ExcerptResult, FaqEntry, GenerationInput, ImagePrompt, ImageUpload,
    ImagesResponse, ParagraphBody, ParagraphRequest, ParagraphTopic, SeoResult, StoredAsset,
    TitleResult, TitlesInput,
};

/// Operations of the stub, used for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubOperation {
    /// generate-title
    Title,
    /// generate-paragraph-topics
    ParagraphTopics,
    /// generate-paragraph-body
    ParagraphBody,
    /// generate-excerpt
    Excerpt,
    /// generate-seo
    Seo,
    /// generate-faq
    Faq,
    /// generate-images
    Images,
    /// generate-titles
    Titles,
    /// upload-image
    Upload,
}

/// A request client returning fixed responses.
///
/// Paragraph bodies are looked up by topic. Per-topic delays let tests force
/// completion order; failures can be injected per operation or per topic.
#[derive(Debug, Default)]
pub struct StubRequestClient {
    title: String,
    topics: Vec<String>,
    bodies: HashMap<String, String>,
    body_delays: HashMap<String, Duration>,
    failing_topics: HashSet<String>,
    upload_delay: Option<Duration>,
    excerpt: String,
    seo: SeoResult,
    faq: Vec<FaqEntry>,
    images: ImagesResponse,
    titles: Vec<String>,
    assets: Vec<StoredAsset>,
    failing: HashSet<StubOperation>,
    calls: Mutex<HashMap<StubOperation, usize>>,
    completed_bodies: Mutex<Vec<String>>,
    seen_content: Mutex<Vec<ContentInput>>,
    uploads: Mutex<Vec<ImageUpload>>,
}

impl StubRequestClient {
    /// Creates an empty stub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title response.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Adds a topic and the body returned for it.
    #[must_use]
    pub fn with_paragraph(mut self, topic: impl Into<String>, body: impl Into<String>) -> Self {
        let topic = topic.into();
        self.bodies.insert(topic.clone(), body.into());
        self.topics.push(topic);
        self
    }

    /// Delays the body response of a topic.
    #[must_use]
    pub fn with_body_delay(mut self, topic: impl Into<String>, delay: Duration) -> Self {
        self.body_delays.insert(topic.into(), delay);
        self
    }

    /// Makes the body request of a topic fail.
    #[must_use]
    pub fn failing_topic(mut self, topic: impl Into<String>) -> Self {
        self.failing_topics.insert(topic.into());
        self
    }

    /// Delays every upload response.
    #[must_use]
    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    /// Sets the excerpt response.
    #[must_use]
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    /// Sets the SEO response.
    #[must_use]
    pub fn with_seo(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.seo = SeoResult {
            title: title.into(),
            description: description.into(),
        };
        self
    }

    /// Adds a FAQ entry.
    #[must_use]
    pub fn with_faq(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.faq.push(FaqEntry {
            question: question.into(),
            answer: answer.into(),
        });
        self
    }

    /// Sets the image response.
    #[must_use]
    pub fn with_images(mut self, images: ImagesResponse) -> Self {
        self.images = images;
        self
    }

    /// Sets the batch titles response.
    #[must_use]
    pub fn with_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.titles = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the assets returned by uploads.
    #[must_use]
    pub fn with_assets(mut self, assets: Vec<StoredAsset>) -> Self {
        self.assets = assets;
        self
    }

    /// Makes every call of an operation fail.
    #[must_use]
    pub fn failing(mut self, operation: StubOperation) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Number of calls made to an operation.
    #[must_use]
    pub fn calls(&self, operation: StubOperation) -> usize {
        self.calls.lock().get(&operation).copied().unwrap_or(0)
    }

    /// Topics in the order their bodies completed.
    #[must_use]
    pub fn completion_order(&self) -> Vec<String> {
        self.completed_bodies.lock().clone()
    }

    /// Content inputs received by the SEO and FAQ operations.
    #[must_use]
    pub fn seen_content(&self) -> Vec<ContentInput> {
        self.seen_content.lock().clone()
    }

    /// Uploads received.
    #[must_use]
    pub fn uploads(&self) -> Vec<ImageUpload> {
        self.uploads.lock().clone()
    }

    fn record(&self, operation: StubOperation) -> Result<(), TransportError> {
        *self.calls.lock().entry(operation).or_insert(0) += 1;
        if self.failing.contains(&operation) {
            return Err(TransportError::Status {
                status: 500,
                body: format!("{operation:?} unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RequestClient for StubRequestClient {
    async fn generate_title(&self, _input: &GenerationInput) -> Result<TitleResult, TransportError> {
        self.record(StubOperation::Title)?;
        Ok(TitleResult {
            title: self.title.clone(),
        })
    }

    async fn generate_paragraph_topics(
        &self,
        _input: &GenerationInput,
    ) -> Result<Vec<ParagraphTopic>, TransportError> {
        self.record(StubOperation::ParagraphTopics)?;
        Ok(self
            .topics
            .iter()
            .map(|t| ParagraphTopic {
                paragraph: t.clone(),
            })
            .collect())
    }

    async fn generate_paragraph_body(
        &self,
        request: &ParagraphRequest,
    ) -> Result<ParagraphBody, TransportError> {
        self.record(StubOperation::ParagraphBody)?;
        if let Some(delay) = self.body_delays.get(&request.paragraph) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_topics.contains(&request.paragraph) {
            return Err(TransportError::unavailable(format!(
                "body for {} failed",
                request.paragraph
            )));
        }
        let body = self
            .bodies
            .get(&request.paragraph)
            .cloned()
            .ok_or_else(|| TransportError::Decode(format!("no body for {}", request.paragraph)))?;
        self.completed_bodies.lock().push(request.paragraph.clone());
        Ok(ParagraphBody { paragraph: body })
    }

    async fn generate_excerpt(
        &self,
        _input: &GenerationInput,
    ) -> Result<ExcerptResult, TransportError> {
        self.record(StubOperation::Excerpt)?;
        Ok(ExcerptResult {
            excerpt: self.excerpt.clone(),
        })
    }

    async fn generate_seo(&self, input: &ContentInput) -> Result<SeoResult, TransportError> {
        self.seen_content.lock().push(input.clone());
        self.record(StubOperation::Seo)?;
        Ok(self.seo.clone())
    }

    async fn generate_faq(&self, input: &ContentInput) -> Result<Vec<FaqEntry>, TransportError> {
        self.seen_content.lock().push(input.clone());
        self.record(StubOperation::Faq)?;
        Ok(self.faq.clone())
    }

    async fn generate_images(
        &self,
        _prompt: &ImagePrompt,
    ) -> Result<ImagesResponse, TransportError> {
        self.record(StubOperation::Images)?;
        Ok(self.images.clone())
    }

    async fn generate_titles(
        &self,
        input: &TitlesInput,
    ) -> Result<Vec<TitleResult>, TransportError> {
        self.record(StubOperation::Titles)?;
        Ok(self
            .titles
            .iter()
            .take(input.count as usize)
            .map(|t| TitleResult { title: t.clone() })
            .collect())
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<Vec<StoredAsset>, TransportError> {
        self.uploads.lock().push(upload);
        self.record(StubOperation::Upload)?;
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.assets.clone())
    }
}
