//! Image candidate generation.

use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

use crate::cancellation::CancellationToken;
use crate::client::RequestClient;
use crate::core::{GenerationStage, StatusTracker, WorkflowStatus};
use crate::errors::{ArticleflowError, WorkflowFailure};
use crate::events::{NoOpProgressSink, ProgressSink};
use crate::models::{ImageCandidate, ImagePrompt};

/// Requests a set of candidate images for a prompt.
#[derive(Clone)]
pub struct ImageGenerationWorkflow {
    client: Arc<dyn RequestClient>,
    sink: Arc<dyn ProgressSink>,
}

impl ImageGenerationWorkflow {
    /// Creates a workflow that reports to no sink.
    #[must_use]
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self {
            client,
            sink: Arc::new(NoOpProgressSink),
        }
    }

    /// Sets the sink receiving progress events.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Requests candidates with a private tracker.
    pub async fn run(&self, prompt: &ImagePrompt) -> Result<Vec<ImageCandidate>, WorkflowFailure> {
        let token = Arc::new(CancellationToken::new());
        let tracker = StatusTracker::new(self.sink.clone()).with_token(token.clone());
        self.run_tracked(prompt, &tracker, &token).await
    }

    /// Requests candidates against a caller-owned tracker.
    pub async fn run_tracked(
        &self,
        prompt: &ImagePrompt,
        tracker: &StatusTracker,
        token: &CancellationToken,
    ) -> Result<Vec<ImageCandidate>, WorkflowFailure> {
        let span = info_span!("image_run", run_id = %tracker.run_id());
        async {
            tracker.start();
            let stage = GenerationStage::Images;
            tracker.begin_stage(stage);

            let result = match token.run_until_cancelled(self.client.generate_images(prompt)).await {
                None => Err(ArticleflowError::Cancelled(
                    token.reason().unwrap_or_else(|| "cancelled".to_string()),
                )),
                Some(result) => {
                    result.map_err(|e| ArticleflowError::transport(stage.operation(), e))
                }
            };

            match result {
                Ok(response) => {
                    tracker.complete_stage(stage);
                    tracker.set_status(WorkflowStatus::Success);
                    info!(candidates = response.data.len(), "images generated");
                    Ok(response.data)
                }
                Err(error) => {
                    tracker.set_status(WorkflowStatus::Error);
                    warn!(error = %error, "image generation failed");
                    let snapshot = tracker.snapshot();
                    Err(WorkflowFailure::new(error, snapshot.label, snapshot.progress))
                }
            }
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for ImageGenerationWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenerationWorkflow").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::events::CollectingProgressSink;
    use crate::testing::{bike_fixture, StubOperation};

    #[tokio::test]
    async fn test_images_success() {
        let sink = Arc::new(CollectingProgressSink::new());
        let workflow = ImageGenerationWorkflow::new(Arc::new(bike_fixture())).with_sink(sink.clone());
        let token = CancellationToken::new();
        let tracker = StatusTracker::new(sink.clone());

        let images = workflow
            .run_tracked(&ImagePrompt::new("electric bike"), &tracker, &token)
            .await
            .unwrap();

        assert_eq!(images.len(), 3);
        assert_eq!(tracker.status(), WorkflowStatus::Success);
        assert_eq!(tracker.progress(), 1);
        assert_eq!(tracker.label().as_deref(), Some("Generating images..."));
    }

    #[tokio::test]
    async fn test_images_failure() {
        let client = Arc::new(bike_fixture().failing(StubOperation::Images));
        let workflow = ImageGenerationWorkflow::new(client.clone());

        let failure = workflow.run(&ImagePrompt::new("bike")).await.unwrap_err();

        assert_eq!(failure.kind(), ErrorKind::TransportFailure);
        assert_eq!(failure.progress, 0);
        assert_eq!(failure.last_label.as_deref(), Some("Generating images..."));
        assert_eq!(client.calls(StubOperation::Images), 1);
    }
}
