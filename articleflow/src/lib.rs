//! # Articleflow
//!
//! Multi-step article and image generation over a generative content API.
//!
//! An article is drafted in six stages: title, paragraph topics, one body per
//! topic (requested concurrently), excerpt, SEO fields and FAQ. Each run owns
//! its status, progress counter and stage label, reported through a
//! [`ProgressSink`](events::ProgressSink). Image candidates are generated and
//! committed separately, and a [`ReviewSession`](editor::ReviewSession) turns
//! an edited draft into the field updates of the host form.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use articleflow::prelude::*;
//! use std::sync::Arc;
//!
//! let client = HttpRequestClient::new(ClientConfig::from_env()?)?;
//! let workflow = GenerationWorkflow::new(Arc::new(client))
//!     .with_sink(Arc::new(LoggingProgressSink::default()));
//!
//! let draft = workflow
//!     .run(&GenerationInput::new("electric bikes", "en"))
//!     .await?;
//! println!("{}", draft.article.title);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss
)]

pub mod batch;
pub mod cancellation;
pub mod client;
pub mod core;
pub mod editor;
pub mod errors;
pub mod events;
pub mod models;
pub mod observability;
pub mod testing;
pub mod workflow;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{BatchRun, BatchWorkflow, TitleJob};
    pub use crate::cancellation::CancellationToken;
    #[cfg(feature = "http")]
    pub use crate::client::HttpRequestClient;
    pub use crate::client::{ClientConfig, RequestClient, RouteTable};
    pub use crate::core::{
        GenerationStage, ProgressSnapshot, StatusTracker, WorkflowEvent, WorkflowEventKind,
        WorkflowStatus,
    };
    pub use crate::editor::{EditAction, FieldUpdate, FieldValue, ReviewSession};
    pub use crate::errors::{
        ApplyError, ArticleflowError, EditError, ErrorKind, TransportError, UploadError,
        WorkflowFailure,
    };
    pub use crate::events::{
        CollectingProgressSink, LatestRunSink, LoggingProgressSink, NoOpProgressSink,
        ProgressSink,
    };
    pub use crate::models::{
        ArticleDraft, FaqEntry, GenerationInput, ImageCandidate, ImagePrompt, StoredAsset,
        TitlesInput,
    };
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::workflow::{GenerationWorkflow, ImageCommitWorkflow, ImageGenerationWorkflow};
}
