//! Request and response records exchanged with the content backend.

mod article;
mod image;

pub use article::{
    Article, ArticleDraft, ContentInput, ExcerptResult, FaqEntry, GenerationInput, ParagraphBody,
    ParagraphRequest, ParagraphTopic, SeoResult, TitleResult, TitlesInput,
};
pub use image::{ImageCandidate, ImagePrompt, ImageUpload, ImagesResponse, StoredAsset};
