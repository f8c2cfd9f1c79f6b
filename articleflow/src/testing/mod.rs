//! Testing utilities.
//!
//! This module provides a scripted [`RequestClient`](crate::client::RequestClient)
//! and fixtures for exercising the workflows without a backend.

mod fixtures;
mod stub;

pub use fixtures::{bike_fixture, bike_input};
pub use stub::{StubOperation, StubRequestClient};
