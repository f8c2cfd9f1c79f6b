//! Article generation records.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Caller-supplied input of one article run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationInput {
    /// Topic keywords.
    pub keywords: String,
    /// Target language code (e.g. "en").
    pub language: String,
}

impl GenerationInput {
    /// Creates a new input.
    #[must_use]
    pub fn new(keywords: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            language: language.into(),
        }
    }

    /// Builds the body request for one planned topic.
    #[must_use]
    pub fn with_topic(&self, topic: &ParagraphTopic) -> ParagraphRequest {
        ParagraphRequest {
            keywords: self.keywords.clone(),
            language: self.language.clone(),
            paragraph: topic.paragraph.clone(),
        }
    }
}

/// Generation input plus one paragraph topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphRequest {
    /// Topic keywords.
    pub keywords: String,
    /// Target language code.
    pub language: String,
    /// The topic to write a body for.
    pub paragraph: String,
}

/// Input of the batch title endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlesInput {
    /// Topic keywords.
    pub keywords: String,
    /// Target language code.
    pub language: String,
    /// Number of titles to plan.
    pub count: u32,
}

/// Generated title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleResult {
    /// The title.
    pub title: String,
}

/// One planned section of the article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphTopic {
    /// Section heading.
    pub paragraph: String,
}

/// Prose rendered for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphBody {
    /// Section prose.
    pub paragraph: String,
}

/// Generated excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcerptResult {
    /// The excerpt.
    pub excerpt: String,
}

/// Full article content plus language, used by the SEO and FAQ stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInput {
    /// Rendered article content.
    pub content: String,
    /// Target language code.
    pub language: String,
}

/// Generated SEO fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeoResult {
    /// SEO title.
    pub title: String,
    /// SEO description.
    pub description: String,
}

/// One FAQ question and answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// The question.
    pub question: String,
    /// The answer.
    pub answer: String,
}

/// Main article fields of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Article {
    /// Article title.
    pub title: String,
    /// Rendered article content.
    pub content: String,
    /// Article excerpt.
    pub excerpt: String,
}

/// The assembled result of a successful article run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArticleDraft {
    /// Title, content and excerpt.
    pub article: Article,
    /// SEO fields.
    pub seo: SeoResult,
    /// FAQ entries in backend order.
    pub faq: Vec<FaqEntry>,
}

impl ArticleDraft {
    /// SHA-256 hex digest over every field of the draft, length-prefixed.
    ///
    /// Two drafts have the same fingerprint exactly when every field matches.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [&self.article.title, &self.article.content, &self.article.excerpt] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        for part in [&self.seo.title, &self.seo.description] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        hasher.update((self.faq.len() as u64).to_le_bytes());
        for entry in &self.faq {
            for part in [&entry.question, &entry.answer] {
                hasher.update((part.len() as u64).to_le_bytes());
                hasher.update(part.as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}
