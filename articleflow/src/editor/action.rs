//! Edit actions and field updates.

use serde::{Deserialize, Serialize};

use crate::models::{ImageCandidate, StoredAsset};

/// A single edit applied to a review session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum EditAction {
    /// Replace the article title.
    SetTitle(String),
    /// Replace the excerpt.
    SetExcerpt(String),
    /// Replace the rendered content.
    SetContent(String),
    /// Replace the SEO title.
    SetSeoTitle(String),
    /// Replace the SEO description.
    SetSeoDescription(String),
    /// Replace the question of one FAQ entry.
    SetFaqQuestion {
        /// Entry position.
        index: usize,
        /// New question.
        value: String,
    },
    /// Replace the answer of one FAQ entry.
    SetFaqAnswer {
        /// Entry position.
        index: usize,
        /// New answer.
        value: String,
    },
    /// Replace the image candidates. Clears both picks.
    SetImages(Vec<ImageCandidate>),
}

/// Value written to a host form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain text.
    Text(String),
    /// A stored asset.
    Asset(StoredAsset),
}

/// One host form field and its new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    /// Dotted field path, e.g. `seo.0.faq.1.answer`.
    pub name: String,
    /// New value.
    pub value: FieldValue,
}

impl FieldUpdate {
    /// Creates a text update.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        }
    }

    /// Creates an asset update.
    #[must_use]
    pub fn asset(name: impl Into<String>, asset: StoredAsset) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Asset(asset),
        }
    }

    /// Returns the text value, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(text) => Some(text),
            FieldValue::Asset(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serde_tagging() {
        let json = serde_json::to_value(EditAction::SetFaqAnswer {
            index: 2,
            value: "yes".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "set_faq_answer");
        assert_eq!(json["payload"]["index"], 2);

        let parsed: EditAction =
            serde_json::from_str(r#"{"type":"set_title","payload":"New title"}"#).unwrap();
        assert_eq!(parsed, EditAction::SetTitle("New title".to_string()));
    }

    #[test]
    fn test_field_update_value_serializes_flat() {
        let update = FieldUpdate::text("content.title", "Hello");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["name"], "content.title");
        assert_eq!(json["value"], "Hello");
        assert_eq!(update.as_text(), Some("Hello"));
    }
}
