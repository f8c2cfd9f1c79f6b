//! Per-invocation status and progress state.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use super::{GenerationStage, WorkflowEvent, WorkflowEventKind, WorkflowStatus};
use crate::cancellation::CancellationToken;
use crate::events::ProgressSink;

static NEXT_RUN_SEQ: AtomicU64 = AtomicU64::new(1);

/// Point-in-time view of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProgressSnapshot {
    /// Current status.
    pub status: WorkflowStatus,
    /// Completed-stage counter.
    pub progress: u32,
    /// Label of the most recently started stage.
    pub label: Option<String>,
}

/// Owns the status, progress counter and stage label of one invocation.
///
/// Every change is mirrored to the sink as a [`WorkflowEvent`] tagged with
/// this tracker's run id. Once the attached cancellation token fires, the
/// tracker keeps updating its own snapshot but stops emitting, so a stale
/// invocation cannot overwrite what a newer one reports.
pub struct StatusTracker {
    run_id: Uuid,
    run_seq: u64,
    sink: Arc<dyn ProgressSink>,
    token: Option<Arc<CancellationToken>>,
    state: Mutex<ProgressSnapshot>,
}

impl StatusTracker {
    /// Creates a tracker with a fresh run id.
    #[must_use]
    pub fn new(sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_seq: NEXT_RUN_SEQ.fetch_add(1, Ordering::Relaxed),
            sink,
            token: None,
            state: Mutex::new(ProgressSnapshot::default()),
        }
    }

    /// Attaches a cancellation token that mutes the tracker once cancelled.
    #[must_use]
    pub fn with_token(mut self, token: Arc<CancellationToken>) -> Self {
        self.token = Some(token);
        self
    }

    /// Returns the run id.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns the process-wide creation order of this tracker.
    #[must_use]
    pub fn run_seq(&self) -> u64 {
        self.run_seq
    }

    /// Returns the current state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.state.lock().clone()
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> WorkflowStatus {
        self.state.lock().status
    }

    /// Returns the progress counter.
    #[must_use]
    pub fn progress(&self) -> u32 {
        self.state.lock().progress
    }

    /// Returns the current stage label.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.state.lock().label.clone()
    }

    /// Marks the start of a run: status loading, progress reset to zero.
    pub fn start(&self) {
        {
            let mut state = self.state.lock();
            state.progress = 0;
        }
        self.set_status(WorkflowStatus::Loading);
    }

    /// Sets the status.
    pub fn set_status(&self, status: WorkflowStatus) {
        self.state.lock().status = status;
        self.emit(WorkflowEventKind::Status { status });
    }

    /// Reports that a stage started. Stages without a label leave it unchanged.
    pub fn begin_stage(&self, stage: GenerationStage) {
        let Some(label) = stage.label() else {
            return;
        };
        self.state.lock().label = Some(label.to_string());
        self.emit(WorkflowEventKind::StageStarted {
            stage,
            label: label.to_string(),
        });
    }

    /// Reports that a stage completed, advancing progress if the stage ticks.
    pub fn complete_stage(&self, stage: GenerationStage) {
        let progress = {
            let mut state = self.state.lock();
            if stage.ticks_progress() {
                state.progress += 1;
            }
            state.progress
        };
        self.emit(WorkflowEventKind::StageCompleted { stage, progress });
    }

    /// Reports that one fan-out body settled.
    pub fn paragraph_settled(&self, index: usize, completed: usize, total: usize) {
        self.emit(WorkflowEventKind::ParagraphSettled {
            index,
            completed,
            total,
        });
    }

    fn emit(&self, kind: WorkflowEventKind) {
        if self.token.as_ref().is_some_and(|t| t.is_cancelled()) {
            return;
        }
        self.sink
            .try_emit(&WorkflowEvent::new(self.run_id, kind).with_run_seq(self.run_seq));
    }
}

impl std::fmt::Debug for StatusTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusTracker")
            .field("run_id", &self.run_id)
            .field("run_seq", &self.run_seq)
            .field("state", &*self.state.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingProgressSink;

    #[test]
    fn test_tracker_progress_and_label() {
        let sink = Arc::new(CollectingProgressSink::new());
        let tracker = StatusTracker::new(sink.clone());

        tracker.start();
        tracker.begin_stage(GenerationStage::Title);
        tracker.complete_stage(GenerationStage::Title);
        tracker.begin_stage(GenerationStage::ParagraphBodies);
        tracker.complete_stage(GenerationStage::ParagraphBodies);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.status, WorkflowStatus::Loading);
        assert_eq!(snapshot.progress, 1);
        assert_eq!(snapshot.label.as_deref(), Some("Generating title..."));
        assert_eq!(sink.len(), 4);
        assert!(sink.events().iter().all(|e| e.run_id == tracker.run_id()));
    }

    #[test]
    fn test_run_seq_increases_and_tags_events() {
        let sink = Arc::new(CollectingProgressSink::new());
        let first = StatusTracker::new(sink.clone());
        let second = StatusTracker::new(sink.clone());
        assert!(second.run_seq() > first.run_seq());

        second.start();
        assert_eq!(sink.events()[0].run_seq, second.run_seq());
    }

    #[test]
    fn test_start_resets_progress() {
        let tracker = StatusTracker::new(Arc::new(CollectingProgressSink::new()));
        tracker.start();
        tracker.complete_stage(GenerationStage::Excerpt);
        assert_eq!(tracker.progress(), 1);

        tracker.start();
        assert_eq!(tracker.progress(), 0);
    }

    #[test]
    fn test_cancelled_tracker_stops_emitting() {
        let sink = Arc::new(CollectingProgressSink::new());
        let token = Arc::new(CancellationToken::new());
        let tracker = StatusTracker::new(sink.clone()).with_token(token.clone());

        tracker.start();
        token.cancel("superseded");
        tracker.complete_stage(GenerationStage::Title);
        tracker.set_status(WorkflowStatus::Error);

        assert_eq!(sink.len(), 1);
        assert_eq!(tracker.status(), WorkflowStatus::Error);
        assert_eq!(tracker.progress(), 1);
    }
}
