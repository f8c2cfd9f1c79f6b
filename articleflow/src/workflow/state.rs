//! Article workflow as an explicit linear state machine.

use std::future::Future;
use tracing::{info, warn};

use super::content::render_content;
use super::fanout::fetch_paragraph_bodies;
use crate::cancellation::CancellationToken;
use crate::client::RequestClient;
use crate::core::{GenerationStage, StatusTracker};
use crate::errors::{ArticleflowError, TransportError};
use crate::models::{
    Article, ArticleDraft, ContentInput, GenerationInput, ParagraphTopic, SeoResult,
};

/// Everything a stage transition needs besides the accumulated state.
pub struct StageEnv<'a> {
    /// The backend.
    pub client: &'a dyn RequestClient,
    /// Input of the run.
    pub input: &'a GenerationInput,
    /// Status and progress of the run.
    pub tracker: &'a StatusTracker,
    /// Cancellation of the run.
    pub token: &'a CancellationToken,
}

impl<'a> StageEnv<'a> {
    /// Bundles the collaborators of one run.
    #[must_use]
    pub fn new(
        client: &'a dyn RequestClient,
        input: &'a GenerationInput,
        tracker: &'a StatusTracker,
        token: &'a CancellationToken,
    ) -> Self {
        Self {
            client,
            input,
            tracker,
            token,
        }
    }

    pub(crate) fn cancelled_error(&self) -> ArticleflowError {
        ArticleflowError::Cancelled(
            self.token
                .reason()
                .unwrap_or_else(|| "cancelled".to_string()),
        )
    }

    /// Runs one request of `stage`, racing it against cancellation.
    async fn request<T, F>(&self, stage: GenerationStage, fut: F) -> Result<T, ArticleflowError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        match self.token.run_until_cancelled(fut).await {
            None => Err(self.cancelled_error()),
            Some(result) => result.map_err(|e| ArticleflowError::transport(stage.operation(), e)),
        }
    }
}

/// Accumulated state of an article run.
///
/// Each variant holds exactly what later stages need. A failed transition
/// returns an error instead of a state, so no partial draft ever exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleState {
    /// Nothing requested yet.
    NotStarted,
    /// Title known.
    TitleDone {
        /// Article title.
        title: String,
    },
    /// Topics planned.
    TopicsDone {
        /// Article title.
        title: String,
        /// Planned topics in backend order.
        topics: Vec<ParagraphTopic>,
    },
    /// Every body fetched and the content rendered.
    BodiesDone {
        /// Article title.
        title: String,
        /// Rendered content.
        content: String,
    },
    /// Excerpt known.
    ExcerptDone {
        /// Article title.
        title: String,
        /// Rendered content.
        content: String,
        /// Excerpt.
        excerpt: String,
    },
    /// SEO fields known.
    SeoDone {
        /// Article title.
        title: String,
        /// Rendered content.
        content: String,
        /// Excerpt.
        excerpt: String,
        /// SEO fields.
        seo: SeoResult,
    },
    /// The draft is assembled.
    FaqDone(ArticleDraft),
}

impl ArticleState {
    /// The stage the next call to [`advance`](Self::advance) performs.
    #[must_use]
    pub fn next_stage(&self) -> Option<GenerationStage> {
        match self {
            Self::NotStarted => Some(GenerationStage::Title),
            Self::TitleDone { .. } => Some(GenerationStage::ParagraphTopics),
            Self::TopicsDone { .. } => Some(GenerationStage::ParagraphBodies),
            Self::BodiesDone { .. } => Some(GenerationStage::Excerpt),
            Self::ExcerptDone { .. } => Some(GenerationStage::Seo),
            Self::SeoDone { .. } => Some(GenerationStage::Faq),
            Self::FaqDone(_) => None,
        }
    }

    /// Returns true once the draft is assembled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::FaqDone(_))
    }

    /// Consumes the state, returning the draft if complete.
    #[must_use]
    pub fn into_draft(self) -> Option<ArticleDraft> {
        match self {
            Self::FaqDone(draft) => Some(draft),
            _ => None,
        }
    }

    /// Performs exactly one transition.
    ///
    /// Reports the stage label before the request and advances progress after
    /// it. A completed state is returned unchanged.
    pub async fn advance(self, env: &StageEnv<'_>) -> Result<Self, ArticleflowError> {
        let Some(stage) = self.next_stage() else {
            return Ok(self);
        };
        if env.token.is_cancelled() {
            return Err(env.cancelled_error());
        }

        env.tracker.begin_stage(stage);
        info!(stage = %stage, "stage started");

        let next = self.transition(stage, env).await;
        match &next {
            Ok(_) => {
                env.tracker.complete_stage(stage);
                info!(stage = %stage, progress = env.tracker.progress(), "stage completed");
            }
            Err(e) => warn!(stage = %stage, error = %e, "stage failed"),
        }
        next
    }

    async fn transition(
        self,
        stage: GenerationStage,
        env: &StageEnv<'_>,
    ) -> Result<Self, ArticleflowError> {
        let input = env.input;
        let state = match self {
            Self::NotStarted => {
                let result = env
                    .request(stage, env.client.generate_title(input))
                    .await?;
                Self::TitleDone {
                    title: result.title,
                }
            }
            Self::TitleDone { title } => {
                let topics = env
                    .request(stage, env.client.generate_paragraph_topics(input))
                    .await?;
                Self::TopicsDone { title, topics }
            }
            Self::TopicsDone { title, topics } => {
                let bodies = fetch_paragraph_bodies(env, &topics).await?;
                Self::BodiesDone {
                    title,
                    content: render_content(&topics, &bodies),
                }
            }
            Self::BodiesDone { title, content } => {
                let result = env
                    .request(stage, env.client.generate_excerpt(input))
                    .await?;
                Self::ExcerptDone {
                    title,
                    content,
                    excerpt: result.excerpt,
                }
            }
            Self::ExcerptDone {
                title,
                content,
                excerpt,
            } => {
                let content_input = content_input(&content, input);
                let seo = env
                    .request(stage, env.client.generate_seo(&content_input))
                    .await?;
                Self::SeoDone {
                    title,
                    content,
                    excerpt,
                    seo,
                }
            }
            Self::SeoDone {
                title,
                content,
                excerpt,
                seo,
            } => {
                let content_input = content_input(&content, input);
                let faq = env
                    .request(stage, env.client.generate_faq(&content_input))
                    .await?;
                Self::FaqDone(ArticleDraft {
                    article: Article {
                        title,
                        content,
                        excerpt,
                    },
                    seo,
                    faq,
                })
            }
            done @ Self::FaqDone(_) => done,
        };
        Ok(state)
    }
}

fn content_input(content: &str, input: &GenerationInput) -> ContentInput {
    ContentInput {
        content: content.to_string(),
        language: input.language.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorkflowStatus;
    use crate::errors::ErrorKind;
    use crate::events::CollectingProgressSink;
    use crate::testing::{bike_fixture, bike_input, StubOperation};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn tracker() -> StatusTracker {
        StatusTracker::new(Arc::new(CollectingProgressSink::new()))
    }

    #[tokio::test]
    async fn test_not_started_to_title_done() {
        let client = bike_fixture();
        let input = bike_input();
        let tracker = tracker();
        let token = CancellationToken::new();
        let env = StageEnv::new(&client, &input, &tracker, &token);

        let state = ArticleState::NotStarted.advance(&env).await.unwrap();
        assert_eq!(
            state,
            ArticleState::TitleDone {
                title: "Top Electric Bikes".to_string()
            }
        );
        assert_eq!(tracker.progress(), 1);
        assert_eq!(tracker.label().as_deref(), Some("Generating title..."));
    }

    #[tokio::test]
    async fn test_topics_done_to_bodies_done_keeps_progress() {
        let client = bike_fixture();
        let input = bike_input();
        let tracker = tracker();
        let token = CancellationToken::new();
        let env = StageEnv::new(&client, &input, &tracker, &token);

        let state = ArticleState::TopicsDone {
            title: "T".to_string(),
            topics: vec![ParagraphTopic {
                paragraph: "Price".to_string(),
            }],
        };
        let state = state.advance(&env).await.unwrap();
        assert_eq!(
            state,
            ArticleState::BodiesDone {
                title: "T".to_string(),
                content: "<h2>Price</h2><p>Expect to pay from 1000 EUR.</p>".to_string(),
            }
        );
        assert_eq!(tracker.progress(), 0);
        assert_eq!(tracker.label(), None);
    }

    #[tokio::test]
    async fn test_excerpt_done_sends_content_to_seo() {
        let client = bike_fixture();
        let input = bike_input();
        let tracker = tracker();
        let token = CancellationToken::new();
        let env = StageEnv::new(&client, &input, &tracker, &token);

        let state = ArticleState::ExcerptDone {
            title: "T".to_string(),
            content: "<h2>X</h2><p>y</p>".to_string(),
            excerpt: "E".to_string(),
        };
        let state = state.advance(&env).await.unwrap();
        assert_eq!(state.next_stage(), Some(GenerationStage::Faq));
        assert_eq!(
            client.seen_content(),
            vec![ContentInput {
                content: "<h2>X</h2><p>y</p>".to_string(),
                language: "en".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_seo_done_assembles_draft() {
        let client = bike_fixture();
        let input = bike_input();
        let tracker = tracker();
        let token = CancellationToken::new();
        let env = StageEnv::new(&client, &input, &tracker, &token);

        let state = ArticleState::SeoDone {
            title: "T".to_string(),
            content: "C".to_string(),
            excerpt: "E".to_string(),
            seo: SeoResult::default(),
        };
        let state = state.advance(&env).await.unwrap();
        assert!(state.is_complete());
        let draft = state.into_draft().unwrap();
        assert_eq!(draft.article.title, "T");
        assert_eq!(draft.faq.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_transition_reports_operation() {
        let client = bike_fixture().failing(StubOperation::Excerpt);
        let input = bike_input();
        let tracker = tracker();
        let token = CancellationToken::new();
        let env = StageEnv::new(&client, &input, &tracker, &token);

        let state = ArticleState::BodiesDone {
            title: "T".to_string(),
            content: "C".to_string(),
        };
        let err = state.advance(&env).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(err.to_string().contains("generate-excerpt"));
        assert_eq!(tracker.progress(), 0);
        assert_eq!(tracker.label().as_deref(), Some("Generating excerpt..."));
        assert_eq!(tracker.status(), WorkflowStatus::Idle);
    }

    #[tokio::test]
    async fn test_cancelled_before_stage() {
        let client = bike_fixture();
        let input = bike_input();
        let tracker = tracker();
        let token = CancellationToken::new();
        token.cancel("closed");
        let env = StageEnv::new(&client, &input, &tracker, &token);

        let err = ArticleState::NotStarted.advance(&env).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(client.calls(StubOperation::Title), 0);
        assert_eq!(tracker.label(), None);
    }

    #[tokio::test]
    async fn test_complete_state_is_fixed_point() {
        let client = bike_fixture();
        let input = bike_input();
        let tracker = tracker();
        let token = CancellationToken::new();
        let env = StageEnv::new(&client, &input, &tracker, &token);

        let done = ArticleState::FaqDone(ArticleDraft::default());
        let again = done.clone().advance(&env).await.unwrap();
        assert_eq!(again, done);
        assert_eq!(tracker.progress(), 0);
    }
}
