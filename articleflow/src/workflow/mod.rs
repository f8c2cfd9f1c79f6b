//! Generation workflows.
//!
//! - [`GenerationWorkflow`] drafts a full article in six stages
//! - [`ImageGenerationWorkflow`] requests a set of image candidates
//! - [`ImageCommitWorkflow`] uploads a picked candidate as a stored asset

mod article;
mod commit;
mod content;
mod fanout;
mod images;
mod state;


pub use article::GenerationWorkflow;
pub use commit::ImageCommitWorkflow;
pub use content::{render_content, render_fragment};
pub use fanout::fetch_paragraph_bodies;
pub use images::ImageGenerationWorkflow;
pub use state::{ArticleState, StageEnv};
