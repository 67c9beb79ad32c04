//! Normalization of raw feed entries into [`ArticleRecord`]s.
//!
//! `title` and `link` are required. `published` and `summary` default to
//! an empty string. `source` is the publisher name with any trailing
//! `" - <qualifier>"` segment removed.
//!
//! An entry missing a required field invalidates the entire batch: the
//! result is [`Extraction::Empty`], never a partial list.

use crate::error::EntryError;
use crate::http::FetchText;
use crate::models::{ArticleRecord, FeedEntry};
use crate::scrapers::rss::parse_feed;
use tracing::{info, instrument, warn};

/// Outcome of feed normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// At least one article, in feed order.
    Articles(Vec<ArticleRecord>),
    /// Nothing usable: fetch failure, empty feed, or an invalid entry.
    Empty,
}

/// Fetch the feed at `feed_url` and normalize at most `cap` entries.
///
/// Never fails outward; every internal failure becomes [`Extraction::Empty`].
#[instrument(level = "info", skip(fetcher))]
pub async fn normalize<F: FetchText>(fetcher: &F, feed_url: &str, cap: usize) -> Extraction {
    let xml = match fetcher.fetch_text(feed_url, None).await {
        Ok(xml) => xml,
        Err(e) => {
            warn!(error = %e, "Feed fetch failed");
            return Extraction::Empty;
        }
    };

    let feed = parse_feed(&xml);
    let available = feed.entries.len();
    match normalize_entries(feed.entries, cap) {
        Ok(articles) if articles.is_empty() => {
            warn!("Feed has no entries");
            Extraction::Empty
        }
        Ok(articles) => {
            info!(available, kept = articles.len(), "Normalized feed entries");
            Extraction::Articles(articles)
        }
        Err(e) => {
            warn!(error = %e, "Discarding batch");
            Extraction::Empty
        }
    }
}

/// Normalize the first `cap` entries, preserving order.
///
/// # Errors
///
/// [`EntryError::MissingField`] for the first kept entry lacking `title` or
/// `link`. Entries past `cap` are never inspected.
pub fn normalize_entries(
    entries: Vec<FeedEntry>,
    cap: usize,
) -> Result<Vec<ArticleRecord>, EntryError> {
    entries
        .into_iter()
        .take(cap)
        .enumerate()
        .map(|(index, entry)| to_article(index, entry))
        .collect()
}

fn to_article(index: usize, entry: FeedEntry) -> Result<ArticleRecord, EntryError> {
    let title = entry
        .title
        .ok_or(EntryError::MissingField { index, field: "title" })?;
    let link = entry
        .link
        .ok_or(EntryError::MissingField { index, field: "link" })?;
    let source = entry
        .source
        .and_then(|s| s.title)
        .map(|t| clean_source(&t).to_string())
        .unwrap_or_default();

    Ok(ArticleRecord {
        title,
        link,
        published: entry.published.unwrap_or_default(),
        source,
        summary: entry.summary.unwrap_or_default(),
    })
}

/// Publisher name up to the first `" - "`, or the whole name.
pub fn clean_source(name: &str) -> &str {
    match name.split_once(" - ") {
        Some((head, _)) => head,
        None => name,
    }
}
