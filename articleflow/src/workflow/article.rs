//! Full article generation.

use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

use super::state::{ArticleState, StageEnv};
use crate::cancellation::CancellationToken;
use crate::client::RequestClient;
use crate::core::{StatusTracker, WorkflowStatus};
use crate::errors::{ArticleflowError, WorkflowFailure};
use crate::events::{NoOpProgressSink, ProgressSink};
use crate::models::{ArticleDraft, GenerationInput};

/// Drafts an article: title, topics, bodies, excerpt, SEO fields and FAQ.
///
/// Every [`run`](Self::run) owns a fresh [`StatusTracker`], so concurrent or
/// repeated runs never share status or progress.
#[derive(Clone)]
pub struct GenerationWorkflow {
    client: Arc<dyn RequestClient>,
    sink: Arc<dyn ProgressSink>,
}

impl GenerationWorkflow {
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

    /// Creates a tracker for one invocation, muted once `token` fires.
    #[must_use]
    pub fn tracker(&self, token: &Arc<CancellationToken>) -> StatusTracker {
        StatusTracker::new(self.sink.clone()).with_token(token.clone())
    }

    /// Runs all stages with a private tracker and no external cancellation.
    pub async fn run(&self, input: &GenerationInput) -> Result<ArticleDraft, WorkflowFailure> {
        let token = Arc::new(CancellationToken::new());
        let tracker = self.tracker(&token);
        self.run_tracked(input, &tracker, &token).await
    }

    /// Runs all stages, cancellable through `token`.
    pub async fn run_with_token(
        &self,
        input: &GenerationInput,
        token: Arc<CancellationToken>,
    ) -> Result<ArticleDraft, WorkflowFailure> {
        let tracker = self.tracker(&token);
        self.run_tracked(input, &tracker, &token).await
    }

    /// Runs all stages against a caller-owned tracker.
    ///
    /// The tracker is reset at start. On failure it keeps the last label and
    /// progress value for diagnostics.
    pub async fn run_tracked(
        &self,
        input: &GenerationInput,
        tracker: &StatusTracker,
        token: &CancellationToken,
    ) -> Result<ArticleDraft, WorkflowFailure> {
        let span = info_span!(
            "article_run",
            run_id = %tracker.run_id(),
            keywords = %input.keywords,
            language = %input.language,
        );
        async {
            tracker.start();
            let env = StageEnv::new(self.client.as_ref(), input, tracker, token);

            match Self::drive(&env).await {
                Ok(draft) => {
                    tracker.set_status(WorkflowStatus::Success);
                    info!(faq = draft.faq.len(), "article drafted");
                    Ok(draft)
                }
                Err(error) => {
                    tracker.set_status(WorkflowStatus::Error);
                    let snapshot = tracker.snapshot();
                    warn!(kind = %error.kind(), label = ?snapshot.label, "article run failed");
                    Err(WorkflowFailure::new(error, snapshot.label, snapshot.progress))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn drive(env: &StageEnv<'_>) -> Result<ArticleDraft, ArticleflowError> {
        let mut state = ArticleState::NotStarted;
        loop {
            state = state.advance(env).await?;
            if let ArticleState::FaqDone(draft) = state {
                return Ok(draft);
            }
        }
    }
}

impl std::fmt::Debug for GenerationWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationWorkflow").finish_non_exhaustive()
    }
}
