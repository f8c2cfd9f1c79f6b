//! Workflow status and generation stage enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of one workflow invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Nothing has started yet.
    #[default]
    Idle,
    /// Requests are in flight.
    Loading,
    /// The run finished and produced a result.
    Success,
    /// The run failed.
    Error,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl WorkflowStatus {
    /// Returns true while the run is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the run failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns true if the run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true if nothing has started.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true once the run has either succeeded or failed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// A step of the article or image generation workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    /// Article title.
    Title,
    /// Planned paragraph topics.
    ParagraphTopics,
    /// Concurrent paragraph bodies.
    ParagraphBodies,
    /// Article excerpt.
    Excerpt,
    /// SEO title and description.
    Seo,
    /// FAQ entries.
    Faq,
    /// Image candidates.
    Images,
}

impl GenerationStage {
    /// Article stages in execution order.
    pub const ARTICLE: [Self; 6] = [
        Self::Title,
        Self::ParagraphTopics,
        Self::ParagraphBodies,
        Self::Excerpt,
        Self::Seo,
        Self::Faq,
    ];

    /// Human-readable label reported when the stage starts.
    ///
    /// The paragraph-body fan-out has no label of its own and keeps the
    /// label of the topics stage.
    #[must_use]
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Title => Some("Generating title..."),
            Self::ParagraphTopics => Some("Generating paragraphs..."),
            Self::ParagraphBodies => None,
            Self::Excerpt => Some("Generating excerpt..."),
            Self::Seo => Some("Generating seo fields..."),
            Self::Faq => Some("Generating faq..."),
            Self::Images => Some("Generating images..."),
        }
    }

    /// Whether completing the stage advances the progress counter.
    #[must_use]
    pub fn ticks_progress(&self) -> bool {
        !matches!(self, Self::ParagraphBodies)
    }

    /// Logical client operation used by the stage.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Title => "generate-title",
            Self::ParagraphTopics => "generate-paragraph-topics",
            Self::ParagraphBodies => "generate-paragraph-body",
            Self::Excerpt => "generate-excerpt",
            Self::Seo => "generate-seo",
            Self::Faq => "generate-faq",
            Self::Images => "generate-images",
        }
    }

    /// Total progress ticks of a successful article run.
    #[must_use]
    pub fn article_ticks() -> u32 {
        Self::ARTICLE.iter().filter(|s| s.ticks_progress()).count() as u32
    }
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::ParagraphTopics => write!(f, "paragraph_topics"),
            Self::ParagraphBodies => write!(f, "paragraph_bodies"),
            Self::Excerpt => write!(f, "excerpt"),
            Self::Seo => write!(f, "seo"),
            Self::Faq => write!(f, "faq"),
            Self::Images => write!(f, "images"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(WorkflowStatus::Idle.to_string(), "idle");
        assert_eq!(WorkflowStatus::Loading.to_string(), "loading");
        assert_eq!(WorkflowStatus::Success.to_string(), "success");
        assert_eq!(WorkflowStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_status_predicates() {
        assert!(WorkflowStatus::default().is_idle());
        assert!(WorkflowStatus::Loading.is_loading());
        assert!(!WorkflowStatus::Loading.is_finished());
        assert!(WorkflowStatus::Error.is_finished());
        assert!(WorkflowStatus::Success.is_finished());
    }

    #[test]
    fn test_status_serialize() {
        let json = serde_json::to_string(&WorkflowStatus::Loading).unwrap();
        assert_eq!(json, r#""loading""#);

        let status: WorkflowStatus = serde_json::from_str(r#""error""#).unwrap();
        assert_eq!(status, WorkflowStatus::Error);
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(GenerationStage::Title.label(), Some("Generating title..."));
        assert_eq!(GenerationStage::Seo.label(), Some("Generating seo fields..."));
        assert_eq!(GenerationStage::ParagraphBodies.label(), None);
        assert_eq!(GenerationStage::Images.label(), Some("Generating images..."));
    }

    #[test]
    fn test_article_ticks() {
        assert_eq!(GenerationStage::article_ticks(), 5);
        assert!(!GenerationStage::ParagraphBodies.ticks_progress());
    }
}
