//! Shared fixtures for archive integration tests.

pub mod github;
pub mod mailbox;
