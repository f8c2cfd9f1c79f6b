//! Article content rendering.

use crate::models::{ParagraphBody, ParagraphTopic};

/// Renders one topic and its body as a heading plus paragraph.
#[must_use]
pub fn render_fragment(topic: &ParagraphTopic, body: &ParagraphBody) -> String {
    format!("<h2>{}</h2><p>{}</p>", topic.paragraph, body.paragraph)
}

/// Concatenates the fragments of every topic in topic order.
///
/// `bodies[i]` must belong to `topics[i]`. When the slices differ in length,
/// only the first `min(topics.len(), bodies.len())` pairs are rendered and the
/// unmatched tail of the longer slice is ignored.
#[must_use]
pub fn render_content(topics: &[ParagraphTopic], bodies: &[ParagraphBody]) -> String {
    topics
        .iter()
        .zip(bodies)
        .map(|(topic, body)| render_fragment(topic, body))
        .collect()
}
