//! Cooperative cancellation for workflow invocations.

mod token;

pub use token::{CancelCallback, CancellationToken};
