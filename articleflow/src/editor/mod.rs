//! Review editor for generated drafts.

mod action;
mod session;

pub use action::{EditAction, FieldUpdate, FieldValue};
pub use session::ReviewSession;
