//! Feed discovery and article extraction.
//!
//! The extraction runs in two stages:
//!
//! 1. **Discovery** ([`topic`]): fetch the Google News topic page and find
//!    its feed endpoint
//! 2. **Normalization** ([`normalize`]): fetch the feed, parse it with
//!    [`rss`] and turn each entry into an `ArticleRecord`
//!
//! Each stage reports a coarse outcome enum rather than an error; the
//! pipeline decides what those outcomes mean for the run.

pub mod normalize;
pub mod rss;
pub mod topic;
