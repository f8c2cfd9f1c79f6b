//! Upload of a picked image candidate.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::RequestClient;
use crate::errors::{ArticleflowError, UploadError};
use crate::models::{ImageCandidate, ImageUpload, StoredAsset};

const PNG_MIME: &str = "image/png";

/// Turns an image candidate into a stored asset.
///
/// Each commit gets its own file name (`{stem}-{uuid}.png`), so repeated
/// commits in one session never collide in storage.
#[derive(Clone)]
pub struct ImageCommitWorkflow {
    client: Arc<dyn RequestClient>,
    file_stem: String,
}

impl ImageCommitWorkflow {
    /// Creates a commit workflow naming files `image-{uuid}.png`.
    #[must_use]
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self {
            client,
            file_stem: "image".to_string(),
        }
    }

    /// Sets the file name stem.
    #[must_use]
    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    /// Decodes the candidate payload and names the file.
    pub fn prepare(&self, candidate: &ImageCandidate) -> Result<ImageUpload, UploadError> {
        let payload = candidate
            .b64_json
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(UploadError::MissingPayload)?;
        let bytes = STANDARD.decode(payload.trim())?;
        Ok(ImageUpload {
            file_name: format!("{}-{}.png", self.file_stem, Uuid::new_v4()),
            mime: PNG_MIME.to_string(),
            bytes,
        })
    }

    /// Uploads the candidate and returns the stored asset.
    pub async fn commit(&self, candidate: &ImageCandidate) -> Result<StoredAsset, ArticleflowError> {
        let upload = self.prepare(candidate)?;
        let file_name = upload.file_name.clone();

        let assets = self.client.upload_image(upload).await.map_err(|e| {
            warn!(%file_name, error = %e, "image upload failed");
            UploadError::Transport(e)
        })?;
        let asset = assets.into_iter().next().ok_or(UploadError::EmptyResponse)?;

        info!(%file_name, asset_id = asset.id, "image committed");
        Ok(asset)
    }
}

impl std::fmt::Debug for ImageCommitWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCommitWorkflow")
            .field("file_stem", &self.file_stem)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockRequestClient;
    use crate::errors::{ErrorKind, TransportError};
    use crate::testing::{bike_fixture, StubRequestClient};

    #[test]
    fn test_prepare_decodes_and_names_uniquely() {
        let workflow = ImageCommitWorkflow::new(Arc::new(StubRequestClient::new()));
        let candidate = ImageCandidate::from_base64("cG5nLWJ5dGVz");

        let first = workflow.prepare(&candidate).unwrap();
        let second = workflow.prepare(&candidate).unwrap();

        assert_eq!(first.bytes, b"png-bytes");
        assert_eq!(first.mime, "image/png");
        assert!(first.file_name.starts_with("image-"));
        assert!(first.file_name.ends_with(".png"));
        assert_ne!(first.file_name, second.file_name);
    }

    #[test]
    fn test_prepare_rejects_bad_payloads() {
        let workflow = ImageCommitWorkflow::new(Arc::new(StubRequestClient::new()));

        let err = workflow.prepare(&ImageCandidate::default()).unwrap_err();
        assert!(matches!(err, UploadError::MissingPayload));

        let err = workflow
            .prepare(&ImageCandidate::from_base64("not base64!"))
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_commit_returns_first_asset() {
        let client = Arc::new(bike_fixture());
        let workflow = ImageCommitWorkflow::new(client.clone()).with_file_stem("cover");

        let asset = workflow
            .commit(&ImageCandidate::from_base64("cG5nLWJ5dGVz"))
            .await
            .unwrap();

        assert_eq!(asset.id, 7);
        let uploads = client.uploads();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].file_name.starts_with("cover-"));
    }

    #[tokio::test]
    async fn test_commit_empty_response_is_upload_failure() {
        let mut mock = MockRequestClient::new();
        mock.expect_upload_image()
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let workflow = ImageCommitWorkflow::new(Arc::new(mock));

        let err = workflow
            .commit(&ImageCandidate::from_base64("cG5nLWJ5dGVz"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UploadFailure);
        assert!(matches!(err, ArticleflowError::Upload(UploadError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_commit_transport_error_is_upload_failure() {
        let mut mock = MockRequestClient::new();
        mock.expect_upload_image()
            .withf(|upload| upload.mime == "image/png")
            .returning(|_| {
                Err(TransportError::Status {
                    status: 413,
                    body: "too large".to_string(),
                })
            });
        let workflow = ImageCommitWorkflow::new(Arc::new(mock));

        let err = workflow
            .commit(&ImageCandidate::from_base64("cG5nLWJ5dGVz"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UploadFailure);
        assert!(err.to_string().contains("413"));
    }

    #[tokio::test]
    async fn test_missing_payload_makes_no_request() {
        let mut mock = MockRequestClient::new();
        mock.expect_upload_image().never();
        let workflow = ImageCommitWorkflow::new(Arc::new(mock));

        let err = workflow.commit(&ImageCandidate::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UploadFailure);
    }
}
