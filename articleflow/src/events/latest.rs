//! Sink that only forwards events of the newest invocation.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

use super::ProgressSink;
use crate::core::{WorkflowEvent, WorkflowEventKind, WorkflowStatus};

/// Forwards events of the most recently created run and drops the rest.
///
/// A run takes over when it reports `loading` with a larger `run_seq` than
/// the current run. Late events from an older run are dropped, so a caller
/// that restarts generation never sees a superseded run overwrite the newer
/// run's status or progress. Only the current run is remembered.
pub struct LatestRunSink {
    inner: Arc<dyn ProgressSink>,
    current: Mutex<Option<(u64, Uuid)>>,
}

impl LatestRunSink {
    /// Wraps a sink.
    #[must_use]
    pub fn new(inner: Arc<dyn ProgressSink>) -> Self {
        Self {
            inner,
            current: Mutex::new(None),
        }
    }

    /// Returns the run currently being forwarded.
    #[must_use]
    pub fn current_run(&self) -> Option<Uuid> {
        self.current.lock().map(|(_, run_id)| run_id)
    }

    fn accept(&self, event: &WorkflowEvent) -> bool {
        let mut current = self.current.lock();
        if let Some((_, run_id)) = *current {
            if run_id == event.run_id {
                return true;
            }
        }
        let starts_run = matches!(
            event.kind,
            WorkflowEventKind::Status {
                status: WorkflowStatus::Loading
            }
        );
        let newer = current.map_or(true, |(seq, _)| event.run_seq > seq);
        if starts_run && newer {
            *current = Some((event.run_seq, event.run_id));
            return true;
        }
        false
    }
}

#[async_trait]
impl ProgressSink for LatestRunSink {
    async fn emit(&self, event: &WorkflowEvent) {
        if self.accept(event) {
            self.inner.emit(event).await;
        }
    }

    fn try_emit(&self, event: &WorkflowEvent) {
        if self.accept(event) {
            self.inner.try_emit(event);
        }
    }
}

impl std::fmt::Debug for LatestRunSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatestRunSink")
            .field("current", &self.current_run())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GenerationStage, StatusTracker};
    use crate::events::CollectingProgressSink;

    fn loading(run_id: Uuid, run_seq: u64) -> WorkflowEvent {
        WorkflowEvent::new(
            run_id,
            WorkflowEventKind::Status {
                status: WorkflowStatus::Loading,
            },
        )
        .with_run_seq(run_seq)
    }

    fn completed(run_id: Uuid, run_seq: u64, progress: u32) -> WorkflowEvent {
        WorkflowEvent::new(
            run_id,
            WorkflowEventKind::StageCompleted {
                stage: GenerationStage::Title,
                progress,
            },
        )
        .with_run_seq(run_seq)
    }

    #[test]
    fn test_drops_stale_run_events() {
        let inner = Arc::new(CollectingProgressSink::new());
        let sink = LatestRunSink::new(inner.clone());
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();

        sink.try_emit(&loading(old, 1));
        sink.try_emit(&loading(new, 2));
        sink.try_emit(&completed(old, 1, 1));
        sink.try_emit(&completed(new, 2, 1));

        assert_eq!(sink.current_run(), Some(new));
        let forwarded = inner.events();
        assert_eq!(forwarded.len(), 3);
        assert!(forwarded[1..].iter().all(|e| e.run_id == new));
    }

    #[test]
    fn test_events_before_any_run_are_dropped() {
        let inner = Arc::new(CollectingProgressSink::new());
        let sink = LatestRunSink::new(inner.clone());
        sink.try_emit(&completed(Uuid::new_v4(), 1, 1));
        assert!(inner.is_empty());
    }

    #[test]
    fn test_superseded_run_cannot_take_over_again() {
        let inner = Arc::new(CollectingProgressSink::new());
        let sink = LatestRunSink::new(inner.clone());
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();

        sink.try_emit(&loading(old, 1));
        sink.try_emit(&loading(new, 2));
        sink.try_emit(&loading(old, 1));

        assert_eq!(sink.current_run(), Some(new));
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn test_older_run_starting_late_is_dropped() {
        let inner = Arc::new(CollectingProgressSink::new());
        let sink = LatestRunSink::new(inner.clone());
        let newer = Uuid::new_v4();

        sink.try_emit(&loading(newer, 9));
        sink.try_emit(&loading(Uuid::new_v4(), 4));

        assert_eq!(sink.current_run(), Some(newer));
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn test_many_runs_keep_only_latest() {
        let inner = Arc::new(CollectingProgressSink::new());
        let sink: Arc<LatestRunSink> = Arc::new(LatestRunSink::new(inner.clone()));

        let first = StatusTracker::new(sink.clone());
        first.start();
        let mut last = None;
        for _ in 0..10_000 {
            let tracker = StatusTracker::new(sink.clone());
            tracker.start();
            last = Some(tracker.run_id());
        }
        assert_eq!(sink.current_run(), last);
        assert_eq!(inner.len(), 10_001);

        // The first run restarting is stale and stays muted.
        first.start();
        first.complete_stage(GenerationStage::Title);
        assert_eq!(sink.current_run(), last);
        assert_eq!(inner.len(), 10_001);
    }
}
