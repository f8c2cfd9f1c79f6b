//! Batch runs: a planned list of titles and their per-title status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::client::RequestClient;
use crate::core::WorkflowStatus;
use crate::errors::ArticleflowError;
use crate::models::TitlesInput;

/// One planned article of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleJob {
    /// Planned title.
    pub title: String,
    /// Generation status of this title.
    #[serde(default)]
    pub status: WorkflowStatus,
}

impl TitleJob {
    /// Creates an idle job.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: WorkflowStatus::Idle,
        }
    }

    /// Returns true once the job is past loading.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }
}

/// A batch of titles planned from one keyword set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRun {
    /// Batch identifier.
    pub id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Keywords the titles were planned from.
    pub keywords: String,
    /// Output language.
    pub language: String,
    /// Planned titles.
    pub titles: Vec<TitleJob>,
}

impl BatchRun {
    /// Creates a batch with every job idle.
    #[must_use]
    pub fn new(keywords: impl Into<String>, language: impl Into<String>, titles: Vec<TitleJob>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            keywords: keywords.into(),
            language: language.into(),
            titles,
        }
    }

    /// Number of finished jobs.
    #[must_use]
    pub fn finished(&self) -> usize {
        self.titles.iter().filter(|j| j.is_finished()).count()
    }

    /// Finished jobs as a percentage of all jobs.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.titles.is_empty() {
            0.0
        } else {
            (self.finished() as f64 / self.titles.len() as f64) * 100.0
        }
    }

    /// Returns true when every job finished.
    ///
    /// An empty batch is never done: a vacuous "every job finished" check
    /// would report a batch with nothing planned as complete, so this
    /// deliberately returns false instead.
    #[must_use]
    pub fn is_done(&self) -> bool {
        !self.titles.is_empty() && self.finished() == self.titles.len()
    }

    /// Status of the batch as a whole.
    #[must_use]
    pub fn aggregate_status(&self) -> WorkflowStatus {
        let any = |status: WorkflowStatus| self.titles.iter().any(|j| j.status == status);
        if self.titles.is_empty() {
            WorkflowStatus::Idle
        } else if any(WorkflowStatus::Error) {
            WorkflowStatus::Error
        } else if any(WorkflowStatus::Loading) {
            WorkflowStatus::Loading
        } else if any(WorkflowStatus::Idle) {
            WorkflowStatus::Idle
        } else {
            WorkflowStatus::Success
        }
    }

    /// Titles joined for display.
    #[must_use]
    pub fn title_summary(&self) -> String {
        self.titles
            .iter()
            .map(|j| j.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Sets the status of one job. Returns false for an unknown index.
    pub fn set_status(&mut self, index: usize, status: WorkflowStatus) -> bool {
        match self.titles.get_mut(index) {
            Some(job) => {
                job.status = status;
                true
            }
            None => false,
        }
    }
}

/// Plans batch runs through the backend.
#[derive(Clone)]
pub struct BatchWorkflow {
    client: Arc<dyn RequestClient>,
}

impl BatchWorkflow {
    /// Creates a batch planner.
    #[must_use]
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self { client }
    }

    /// Requests a list of titles and returns a fresh batch.
    pub async fn plan_titles(&self, input: &TitlesInput) -> Result<BatchRun, ArticleflowError> {
        let titles = self
            .client
            .generate_titles(input)
            .await
            .map_err(|e| ArticleflowError::transport("generate-titles", e))?;

        let run = BatchRun::new(
            input.keywords.clone(),
            input.language.clone(),
            titles.into_iter().map(|t| TitleJob::new(t.title)).collect(),
        );
        info!(batch_id = %run.id, titles = run.titles.len(), "batch planned");
        Ok(run)
    }
}

impl std::fmt::Debug for BatchWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchWorkflow").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::testing::{bike_fixture, StubOperation};

    fn batch(statuses: &[WorkflowStatus]) -> BatchRun {
        let titles = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| TitleJob {
                title: format!("t{i}"),
                status: *status,
            })
            .collect();
        BatchRun::new("k", "en", titles)
    }

    #[test]
    fn test_progress_and_done() {
        let run = batch(&[
            WorkflowStatus::Success,
            WorkflowStatus::Error,
            WorkflowStatus::Loading,
            WorkflowStatus::Idle,
        ]);
        assert_eq!(run.finished(), 2);
        assert_eq!(run.progress_percent(), 50.0);
        assert!(!run.is_done());

        let done = batch(&[WorkflowStatus::Success, WorkflowStatus::Error]);
        assert!(done.is_done());
    }

    #[test]
    fn test_empty_batch() {
        let run = batch(&[]);
        assert_eq!(run.progress_percent(), 0.0);
        assert!(!run.is_done());
        assert_eq!(run.aggregate_status(), WorkflowStatus::Idle);
        assert_eq!(run.title_summary(), "");
    }

    #[test]
    fn test_aggregate_status_precedence() {
        use WorkflowStatus::{Error, Idle, Loading, Success};
        assert_eq!(batch(&[Success, Loading, Error]).aggregate_status(), Error);
        assert_eq!(batch(&[Success, Idle, Loading]).aggregate_status(), Loading);
        assert_eq!(batch(&[Success, Idle]).aggregate_status(), Idle);
        assert_eq!(batch(&[Success, Success]).aggregate_status(), Success);
    }

    #[test]
    fn test_set_status() {
        let mut run = batch(&[WorkflowStatus::Idle]);
        assert!(run.set_status(0, WorkflowStatus::Success));
        assert!(!run.set_status(3, WorkflowStatus::Success));
        assert!(run.is_done());
    }

    #[test]
    fn test_serialize_round_trip_keeps_status() {
        let run = batch(&[WorkflowStatus::Loading]);
        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["titles"][0]["status"], "loading");
        let back: BatchRun = serde_json::from_value(json).unwrap();
        assert_eq!(back, run);
    }

    #[tokio::test]
    async fn test_plan_titles() {
        let workflow = BatchWorkflow::new(Arc::new(bike_fixture()));
        let input = TitlesInput {
            keywords: "electric bikes".to_string(),
            language: "en".to_string(),
            count: 2,
        };

        let run = workflow.plan_titles(&input).await.unwrap();

        assert_eq!(run.titles.len(), 2);
        assert_eq!(run.title_summary(), "Best commuter e-bikes, E-bike maintenance");
        assert_eq!(run.aggregate_status(), WorkflowStatus::Idle);
        assert_eq!(run.keywords, "electric bikes");
    }

    #[tokio::test]
    async fn test_plan_titles_failure() {
        let workflow = BatchWorkflow::new(Arc::new(bike_fixture().failing(StubOperation::Titles)));
        let input = TitlesInput {
            keywords: "k".to_string(),
            language: "en".to_string(),
            count: 3,
        };

        let err = workflow.plan_titles(&input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(err.to_string().contains("generate-titles"));
    }
}
