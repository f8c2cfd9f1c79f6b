//! Concurrent paragraph-body fetch.

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use super::state::StageEnv;
use crate::errors::{ArticleflowError, TransportError};
use crate::models::{ParagraphBody, ParagraphTopic};

/// Fetches one body per topic concurrently.
///
/// Requests run together on the calling task. Each result is written into the
/// slot of its topic, so the returned bodies follow topic order whatever the
/// completion order. The first failure returns immediately; the requests still
/// in flight are dropped. Cancellation is honoured while waiting.
pub async fn fetch_paragraph_bodies(
    env: &StageEnv<'_>,
    topics: &[ParagraphTopic],
) -> Result<Vec<ParagraphBody>, ArticleflowError> {
    let total = topics.len();
    let mut slots: Vec<Option<ParagraphBody>> = vec![None; total];

    let mut pending: FuturesUnordered<_> = topics
        .iter()
        .enumerate()
        .map(|(index, topic)| {
            let request = env.input.with_topic(topic);
            async move {
                let result = env.client.generate_paragraph_body(&request).await;
                (index, result)
            }
        })
        .collect();

    let mut completed = 0;
    loop {
        let Some(next) = env.token.run_until_cancelled(pending.next()).await else {
            return Err(env.cancelled_error());
        };
        match next {
            None => break,
            Some((index, Ok(body))) => {
                completed += 1;
                debug!(index, completed, total, "paragraph body settled");
                env.tracker.paragraph_settled(index, completed, total);
                slots[index] = Some(body);
            }
            Some((index, Err(source))) => {
                warn!(index, error = %source, "paragraph body failed, abandoning fan-out");
                return Err(ArticleflowError::Fanout { index, source });
            }
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| ArticleflowError::Fanout {
                index,
                source: TransportError::Decode("paragraph body missing".to_string()),
            })
        })
        .collect()
}
