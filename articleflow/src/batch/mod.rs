//! Batch planning of article titles.

mod run;

pub use run::{BatchRun, BatchWorkflow, TitleJob};
