//! Feed discovery for Google News topic pages.
//!
//! A topic page such as `https://news.google.com/topics/<id>` is HTML, not
//! a feed. The feed lives at `https://news.google.com/rss/topics/<id>` and
//! is normally advertised with
//!
//! ```html
//! <link rel="alternate" type="application/rss+xml" href="https://news.google.com/rss/topics/...">
//! ```
//!
//! That tag is not always present, so the raw page text is also scanned for
//! a feed URL. The `<link>` tag wins whenever both are available.

use crate::http::FetchText;
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Feed URLs embedded in the page text, up to the closing quote.
static FEED_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https://news\.google\.com/rss/topics/[^'"]+"#).unwrap());

/// Outcome of feed discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A feed endpoint was found.
    Resolved(String),
    /// The page could not be fetched or advertised no feed.
    NotFound,
}

/// Resolve a topic page into its feed endpoint.
///
/// Performs a single fetch bounded by `timeout`. Fetch failures are logged
/// and reported as [`Resolution::NotFound`]; nothing is raised.
#[instrument(level = "info", skip(fetcher, timeout))]
pub async fn resolve<F: FetchText>(fetcher: &F, topic_url: &str, timeout: Duration) -> Resolution {
    let body = match fetcher.fetch_text(topic_url, Some(timeout)).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Topic page fetch failed");
            return Resolution::NotFound;
        }
    };

    match find_feed_url(&body) {
        Some(feed_url) => {
            info!(%feed_url, "Discovered feed endpoint");
            Resolution::Resolved(feed_url)
        }
        None => {
            warn!(bytes = body.len(), "Topic page advertises no feed");
            debug!(preview = %truncate_for_log(&body, 300), "Topic page body");
            Resolution::NotFound
        }
    }
}

/// Find the feed URL in a topic page body.
///
/// Tries the `<link type="application/rss+xml">` element first, then the
/// first `https://news.google.com/rss/topics/...` URL in the raw text.
pub fn find_feed_url(body: &str) -> Option<String> {
    if let Some(href) = find_link_href(body) {
        debug!(%href, "Feed found via <link> element");
        return Some(href);
    }

    let found = FEED_URL_PATTERN.find(body).map(|m| m.as_str().to_string());
    if let Some(ref url) = found {
        debug!(%url, "Feed found via text scan");
    }
    found
}

fn find_link_href(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse(r#"link[type="application/rss+xml"]"#).ok()?;
    document
        .select(&selector)
        .find_map(|element| element.value().attr("href"))
        .map(str::to_string)
}
