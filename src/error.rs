//! Error types for the terminal outcomes of a run.
//!
//! Stage-internal failures (network errors, malformed markup, malformed
//! XML) are absorbed where they happen and collapsed into one of the
//! coarse outcomes below.

use thiserror::Error;

/// A run-terminating outcome.
///
/// Both variants end the run without writing a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// No feed endpoint could be discovered on the topic page.
    #[error("Failed to find RSS feed URL")]
    FeedNotFound,
    /// The feed endpoint yielded zero articles.
    #[error("No articles found in RSS feed")]
    NoArticles,
}

impl PipelineError {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::FeedNotFound | PipelineError::NoArticles => 1,
        }
    }
}

/// A feed entry that cannot be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("feed entry {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
}
