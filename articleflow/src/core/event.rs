//! Progress events emitted by the workflows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GenerationStage, WorkflowStatus};

/// What changed in a workflow invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkflowEventKind {
    /// The invocation status changed.
    Status {
        /// New status.
        status: WorkflowStatus,
    },
    /// A stage started and reported its label.
    StageStarted {
        /// The stage.
        stage: GenerationStage,
        /// The label now shown to the editor.
        label: String,
    },
    /// A stage completed.
    StageCompleted {
        /// The stage.
        stage: GenerationStage,
        /// Progress counter after the stage.
        progress: u32,
    },
    /// One paragraph body of the fan-out settled successfully.
    ParagraphSettled {
        /// Topic position of the body.
        index: usize,
        /// Bodies settled so far.
        completed: usize,
        /// Number of topics.
        total: usize,
    },
}

/// An event tagged with the invocation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    /// The invocation that emitted the event.
    pub run_id: Uuid,
    /// Creation order of the invocation; later runs have larger values.
    #[serde(default)]
    pub run_seq: u64,
    /// When the event occurred (RFC 3339).
    pub timestamp: String,
    /// The change.
    #[serde(flatten)]
    pub kind: WorkflowEventKind,
}

impl WorkflowEvent {
    /// Creates a new event stamped with the current time.
    #[must_use]
    pub fn new(run_id: Uuid, kind: WorkflowEventKind) -> Self {
        Self {
            run_id,
            run_seq: 0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            kind,
        }
    }

    /// Sets the creation order of the emitting invocation.
    #[must_use]
    pub fn with_run_seq(mut self, run_seq: u64) -> Self {
        self.run_seq = run_seq;
        self
    }

    /// Dotted event type name used in logs.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            WorkflowEventKind::Status { .. } => "workflow.status",
            WorkflowEventKind::StageStarted { .. } => "stage.started",
            WorkflowEventKind::StageCompleted { .. } => "stage.completed",
            WorkflowEventKind::ParagraphSettled { .. } => "paragraph.settled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let run_id = Uuid::new_v4();
        let event = WorkflowEvent::new(
            run_id,
            WorkflowEventKind::StageCompleted {
                stage: GenerationStage::Title,
                progress: 1,
            },
        );
        assert_eq!(event.event_type(), "stage.completed");
        assert_eq!(event.run_id, run_id);
        assert!(event.timestamp.contains('T'));
    }

    #[test]
    fn test_event_serialization() {
        let event = WorkflowEvent::new(
            Uuid::nil(),
            WorkflowEventKind::Status {
                status: WorkflowStatus::Loading,
            },
        )
        .with_run_seq(3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "status");
        assert_eq!(json["run_seq"], 3);
        assert_eq!(json["status"], "loading");

        let back: WorkflowEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
