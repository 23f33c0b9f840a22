//! Shared helpers for the snare integration tests.

pub mod fixtures;
pub mod mocks;
pub mod setup;
