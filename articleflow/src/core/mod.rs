//! Core status, stage and event types shared by every workflow.

mod event;
mod status;
mod tracker;

pub use event::{WorkflowEvent, WorkflowEventKind};
pub use status::{GenerationStage, WorkflowStatus};
pub use tracker::{ProgressSnapshot, StatusTracker};
