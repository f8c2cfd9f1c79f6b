//! Review of a generated draft before it is written to the host form.

use std::sync::Arc;
use tracing::{info, warn};

use super::{EditAction, FieldUpdate};
use crate::core::{StatusTracker, WorkflowStatus};
use crate::errors::{ApplyError, EditError};
use crate::events::ProgressSink;
use crate::models::{ArticleDraft, ImageCandidate, StoredAsset};
use crate::workflow::ImageCommitWorkflow;

/// Editable copy of a draft plus the image picks of the user.
///
/// The session never writes to the host form itself. [`apply`](Self::apply)
/// commits the picked images and returns the field updates to write, in the
/// order the host expects them.
pub struct ReviewSession {
    draft: ArticleDraft,
    images: Option<Vec<ImageCandidate>>,
    picked_image: Option<usize>,
    seo_picked_image: Option<usize>,
    tracker: StatusTracker,
}

impl ReviewSession {
    /// Opens a session on a draft.
    #[must_use]
    pub fn new(draft: ArticleDraft, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            draft,
            images: None,
            picked_image: None,
            seo_picked_image: None,
            tracker: StatusTracker::new(sink),
        }
    }

    /// Attaches image candidates.
    #[must_use]
    pub fn with_images(mut self, images: Vec<ImageCandidate>) -> Self {
        self.images = Some(images);
        self
    }

    /// Returns the edited draft.
    #[must_use]
    pub fn draft(&self) -> &ArticleDraft {
        &self.draft
    }

    /// Returns the image candidates, if any were attached.
    #[must_use]
    pub fn images(&self) -> Option<&[ImageCandidate]> {
        self.images.as_deref()
    }

    /// Index of the picked content image.
    #[must_use]
    pub fn picked_image(&self) -> Option<usize> {
        self.picked_image
    }

    /// Index of the picked SEO image.
    #[must_use]
    pub fn seo_picked_image(&self) -> Option<usize> {
        self.seo_picked_image
    }

    /// Returns the session status.
    #[must_use]
    pub fn status(&self) -> WorkflowStatus {
        self.tracker.status()
    }

    /// Applies one edit.
    pub fn dispatch(&mut self, action: EditAction) -> Result<(), EditError> {
        if self.tracker.status().is_loading() {
            return Err(EditError::Locked);
        }
        let faq_len = self.draft.faq.len();
        match action {
            EditAction::SetTitle(value) => self.draft.article.title = value,
            EditAction::SetExcerpt(value) => self.draft.article.excerpt = value,
            EditAction::SetContent(value) => self.draft.article.content = value,
            EditAction::SetSeoTitle(value) => self.draft.seo.title = value,
            EditAction::SetSeoDescription(value) => self.draft.seo.description = value,
            EditAction::SetFaqQuestion { index, value } => {
                self.draft
                    .faq
                    .get_mut(index)
                    .ok_or(EditError::FaqIndexOutOfRange { index, len: faq_len })?
                    .question = value;
            }
            EditAction::SetFaqAnswer { index, value } => {
                self.draft
                    .faq
                    .get_mut(index)
                    .ok_or(EditError::FaqIndexOutOfRange { index, len: faq_len })?
                    .answer = value;
            }
            EditAction::SetImages(images) => {
                self.images = Some(images);
                self.picked_image = None;
                self.seo_picked_image = None;
            }
        }
        Ok(())
    }

    /// Picks the content image, or un-picks it if already picked.
    pub fn toggle_image(&mut self, index: usize) -> Result<(), EditError> {
        self.picked_image = self.toggled(self.picked_image, index)?;
        Ok(())
    }

    /// Picks the SEO image, or un-picks it if already picked.
    pub fn toggle_seo_image(&mut self, index: usize) -> Result<(), EditError> {
        self.seo_picked_image = self.toggled(self.seo_picked_image, index)?;
        Ok(())
    }

    fn toggled(&self, current: Option<usize>, index: usize) -> Result<Option<usize>, EditError> {
        if self.tracker.status().is_loading() {
            return Err(EditError::Locked);
        }
        let len = self.images.as_ref().map_or(0, Vec::len);
        if index >= len {
            return Err(EditError::ImageIndexOutOfRange { index, len });
        }
        Ok(if current == Some(index) { None } else { Some(index) })
    }

    fn picked(&self, pick: Option<usize>) -> Result<Option<&ImageCandidate>, EditError> {
        let Some(index) = pick else {
            return Ok(None);
        };
        let candidate = self
            .images
            .as_ref()
            .and_then(|images| images.get(index))
            .filter(|c| c.has_payload())
            .ok_or(EditError::MissingImagePayload(index))?;
        Ok(Some(candidate))
    }

    /// Commits the picked images and returns the form updates.
    ///
    /// Picks are checked before anything is uploaded, so a pick without a
    /// payload leaves the session status untouched. An upload failure sets
    /// the status to error and returns no updates. Dropping the returned
    /// future before it completes also leaves the session in error, so edits
    /// are accepted again.
    pub async fn apply(&self, commit: &ImageCommitWorkflow) -> Result<Vec<FieldUpdate>, ApplyError> {
        let content_image = self.picked(self.picked_image)?;
        let seo_image = self.picked(self.seo_picked_image)?;

        self.tracker.start();
        let guard = ApplyGuard::new(&self.tracker);
        let mut updates = Vec::new();
        for (field, candidate) in [("content.image", content_image), ("seo.0.image", seo_image)] {
            let Some(candidate) = candidate else {
                continue;
            };
            let asset: StoredAsset = match commit.commit(candidate).await {
                Ok(asset) => asset,
                Err(e) => {
                    warn!(field, error = %e, "applying review session failed");
                    guard.finish(WorkflowStatus::Error);
                    return Err(e.into());
                }
            };
            updates.push(FieldUpdate::asset(field, asset));
        }

        updates.extend(self.text_updates());
        guard.finish(WorkflowStatus::Success);
        info!(fields = updates.len(), "review session applied");
        Ok(updates)
    }

    /// Text field updates in host order, without images.
    #[must_use]
    pub fn text_updates(&self) -> Vec<FieldUpdate> {
        let draft = &self.draft;
        let mut updates = vec![
            FieldUpdate::text("content.title", &draft.article.title),
            FieldUpdate::text("content.introduction", &draft.article.excerpt),
            FieldUpdate::text("content.content", &draft.article.content),
            FieldUpdate::text("seo.0.title", &draft.seo.title),
            FieldUpdate::text("seo.0.description", &draft.seo.description),
        ];
        for (i, entry) in draft.faq.iter().enumerate() {
            updates.push(FieldUpdate::text(format!("seo.0.faq.{i}.question"), &entry.question));
            updates.push(FieldUpdate::text(format!("seo.0.faq.{i}.answer"), &entry.answer));
        }
        updates
    }
}

/// Sets the terminal status of an apply, falling back to error when dropped
/// while still loading.
struct ApplyGuard<'a> {
    tracker: &'a StatusTracker,
    finished: bool,
}

impl<'a> ApplyGuard<'a> {
    fn new(tracker: &'a StatusTracker) -> Self {
        Self {
            tracker,
            finished: false,
        }
    }

    fn finish(mut self, status: WorkflowStatus) {
        self.finished = true;
        self.tracker.set_status(status);
    }
}

impl Drop for ApplyGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("review session apply abandoned before completion");
            self.tracker.set_status(WorkflowStatus::Error);
        }
    }
}

impl std::fmt::Debug for ReviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewSession")
            .field("title", &self.draft.article.title)
            .field("images", &self.images.as_ref().map(Vec::len))
            .field("picked_image", &self.picked_image)
            .field("seo_picked_image", &self.seo_picked_image)
            .field("status", &self.tracker.status())
            .finish()
    }
}
