//! Progress sinks.
//!
//! Workflows report status, stage labels and the progress counter through a
//! caller-supplied [`ProgressSink`], which keeps orchestration independent of
//! whatever UI or transport renders the progress.

mod latest;
mod sink;

pub use latest::LatestRunSink;
pub use sink::{CollectingProgressSink, LoggingProgressSink, NoOpProgressSink, ProgressSink};
