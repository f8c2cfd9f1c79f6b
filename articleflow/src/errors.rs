//! Error types for the articleflow workflows.
//!
//! Failures are grouped into a small set of kinds. The workflows never branch
//! on transport details; any error aborts the run that raised it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::WorkflowStatus;

/// Error produced by a [`RequestClient`](crate::client::RequestClient) round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The collaborator could not complete the call for another reason.
    #[error("request unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// Creates an [`TransportError::Unavailable`] error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Returns the HTTP status code if the backend produced one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            #[cfg(feature = "http")]
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Errors raised while turning an image candidate into a stored asset.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The candidate carries no base64 payload.
    #[error("image candidate has no base64 payload")]
    MissingPayload,

    /// The payload is not valid base64.
    #[error("image payload is not valid base64: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    /// The storage collaborator accepted the upload but returned no asset.
    #[error("upload response contained no asset")]
    EmptyResponse,

    /// The upload round trip failed.
    #[error("upload request failed: {0}")]
    Transport(#[source] TransportError),
}

/// The main error type for articleflow operations.
#[derive(Debug, Error)]
pub enum ArticleflowError {
    /// A single request of a sequential stage failed.
    #[error("{operation} failed: {source}")]
    Transport {
        /// The logical operation that failed (e.g. "generate-title").
        operation: &'static str,
        /// The underlying transport error.
        #[source]
        source: TransportError,
    },

    /// One of the concurrent paragraph-body requests failed.
    #[error("paragraph body {index} failed: {source}")]
    Fanout {
        /// Position of the paragraph topic whose request failed.
        index: usize,
        /// The underlying transport error.
        #[source]
        source: TransportError,
    },

    /// Committing an image failed.
    #[error("{0}")]
    Upload(#[from] UploadError),

    /// The invocation was cancelled.
    #[error("workflow cancelled: {0}")]
    Cancelled(String),

    /// The client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ArticleflowError {
    /// Wraps a transport error raised by a sequential stage.
    #[must_use]
    pub fn transport(operation: &'static str, source: TransportError) -> Self {
        Self::Transport { operation, source }
    }

    /// Returns the failure kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::Fanout { .. } => ErrorKind::PartialFanoutFailure,
            Self::Upload(_) => ErrorKind::UploadFailure,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::Config(_) => ErrorKind::Configuration,
        }
    }
}

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A round trip could not be completed.
    TransportFailure,
    /// One of the fan-out requests failed; the whole stage failed with it.
    PartialFanoutFailure,
    /// The image commit path failed.
    UploadFailure,
    /// The caller cancelled the invocation.
    Cancelled,
    /// The client was misconfigured.
    Configuration,
}

impl ErrorKind {
    /// Returns true for failures caused by a request round trip.
    ///
    /// A fan-out failure counts as a transport failure of the whole stage.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportFailure | Self::PartialFanoutFailure)
    }

    /// Generic message shown to an editor for this kind.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::TransportFailure | Self::PartialFanoutFailure => "couldn't generate content",
            Self::UploadFailure => "couldn't upload image",
            Self::Cancelled => "generation was cancelled",
            Self::Configuration => "generation is not configured",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportFailure => write!(f, "transport_failure"),
            Self::PartialFanoutFailure => write!(f, "partial_fanout_failure"),
            Self::UploadFailure => write!(f, "upload_failure"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Failure signal returned by a workflow run.
///
/// Carries no partial payload, only what is needed to explain the failure:
/// the error, the last stage label that was reached and the progress counter
/// at the time of failure.
#[derive(Debug, Error)]
#[error("{error} (last stage: {last_label:?}, progress: {progress})")]
pub struct WorkflowFailure {
    /// The error that aborted the run.
    #[source]
    pub error: ArticleflowError,
    /// The stage label reported last before the failure.
    pub last_label: Option<String>,
    /// The progress counter at the time of failure.
    pub progress: u32,
    /// Terminal status of the run (always [`WorkflowStatus::Error`]).
    pub status: WorkflowStatus,
}

impl WorkflowFailure {
    /// Creates a failure signal.
    #[must_use]
    pub fn new(error: ArticleflowError, last_label: Option<String>, progress: u32) -> Self {
        Self {
            error,
            last_label,
            progress,
            status: WorkflowStatus::Error,
        }
    }

    /// Returns the failure kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Generic message for the editor.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

/// Errors raised by the review editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Edits are disabled while the session is applying.
    #[error("review session is busy")]
    Locked,

    /// The FAQ index does not exist.
    #[error("faq index {index} out of range (len {len})")]
    FaqIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of FAQ entries.
        len: usize,
    },

    /// The image index does not exist.
    #[error("image index {index} out of range (len {len})")]
    ImageIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of image candidates.
        len: usize,
    },

    /// A picked image has no payload to upload.
    #[error("picked image {0} has no payload")]
    MissingImagePayload(usize),
}

/// Errors raised while applying a review session.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The session could not be applied in its current state.
    #[error("{0}")]
    Edit(#[from] EditError),

    /// An image upload failed.
    #[error("{0}")]
    Workflow(#[from] ArticleflowError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = ArticleflowError::transport("generate-title", TransportError::unavailable("down"));
        assert_eq!(err.kind(), ErrorKind::TransportFailure);

        let err = ArticleflowError::Fanout {
            index: 2,
            source: TransportError::unavailable("down"),
        };
        assert_eq!(err.kind(), ErrorKind::PartialFanoutFailure);
        assert!(err.kind().is_transport());

        let err = ArticleflowError::from(UploadError::MissingPayload);
        assert_eq!(err.kind(), ErrorKind::UploadFailure);
        assert!(!err.kind().is_transport());
    }

    #[test]
    fn test_error_display() {
        let err = ArticleflowError::transport(
            "generate-seo",
            TransportError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("generate-seo"));
        assert!(msg.contains("502"));
    }

    #[test]
    fn test_status_code() {
        let err = TransportError::Status {
            status: 429,
            body: String::new(),
        };
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(TransportError::unavailable("x").status_code(), None);
    }

    #[test]
    fn test_workflow_failure_fields() {
        let failure = WorkflowFailure::new(
            ArticleflowError::Cancelled("unmounted".to_string()),
            Some("Generating excerpt...".to_string()),
            2,
        );
        assert_eq!(failure.kind(), ErrorKind::Cancelled);
        assert_eq!(failure.status, WorkflowStatus::Error);
        assert_eq!(failure.progress, 2);
        assert_eq!(failure.user_message(), "generation was cancelled");
    }

    #[test]
    fn test_kind_serialize() {
        let json = serde_json::to_string(&ErrorKind::UploadFailure).unwrap();
        assert_eq!(json, r#""upload_failure""#);
        assert_eq!(ErrorKind::UploadFailure.user_message(), "couldn't upload image");
    }
}
