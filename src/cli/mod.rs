//! CLI operation handlers.
//!
//! - [`archive`]: Archive every pull request of a repository
//! - [`output`]: Run summary formatting

pub mod archive;
pub mod output;
