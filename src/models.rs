//! Data models for feed entries, normalized articles and daily snapshots.
//!
//! This module defines the data structures that flow through the pipeline:
//! - [`FeedEntry`]: A raw feed item with every field optional
//! - [`ArticleRecord`]: The normalized article shape persisted to disk
//! - [`ArchiveSnapshot`]: One day's set of articles, written as JSON

use serde::{Deserialize, Serialize};

/// The `<source>` element attached to a feed entry.
///
/// In RSS the publisher name is the element text; in Atom it is the nested
/// `<title>`. Either way it ends up in `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrySource {
    pub title: Option<String>,
}

/// A raw feed entry as produced by [`crate::scrapers::rss::parse_feed`].
///
/// Absence is explicit: a field is `None` when the feed did not carry it.
/// An empty `title` or `link` element is `Some("")`; the optional fields
/// are `None` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    /// Entry title. Required by normalization.
    pub title: Option<String>,
    /// Article URL. Required by normalization.
    pub link: Option<String>,
    /// Raw provider-formatted publication timestamp.
    pub published: Option<String>,
    /// Description, possibly containing HTML.
    pub summary: Option<String>,
    /// Publisher reference.
    pub source: Option<EntrySource>,
}

/// The result of parsing a feed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    /// Entries in document order.
    pub entries: Vec<FeedEntry>,
}

/// A normalized article.
///
/// Field order matches the persisted JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Display title, as provided by the feed.
    pub title: String,
    /// Article URL.
    pub link: String,
    /// Publication timestamp as the provider formatted it, or empty.
    pub published: String,
    /// Publisher name with any trailing `" - <qualifier>"` removed, or empty.
    pub source: String,
    /// Description, possibly HTML-bearing, or empty.
    pub summary: String,
}

/// One calendar day's archive of articles.
///
/// Serialized to `google-news-<date>.json`. Re-running on the same day
/// overwrites the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArchiveSnapshot {
    /// Archive date in `YYYY-MM-DD` format, in the configured timezone.
    pub date: String,
    /// The topic page the feed was discovered from.
    pub source_url: String,
    /// Articles in feed order.
    pub articles: Vec<ArticleRecord>,
}
