//! The run itself: discover, normalize, persist.
//!
//! ```text
//! topic page ──resolve──▶ feed URL ──normalize──▶ articles ──▶ snapshot JSON ──▶ README
//! ```
//!
//! Discovery and normalization report coarse outcomes
//! ([`Resolution`], [`Extraction`]). Both "nothing found" outcomes end the
//! run through [`PipelineError`] before anything is written. Persistence
//! failures are logged and do not change the exit status.

use crate::config::Config;
use crate::error::PipelineError;
use crate::http::FetchText;
use crate::models::{ArchiveSnapshot, ArticleRecord};
use crate::outputs::{json, readme};
use crate::scrapers::normalize::{Extraction, normalize};
use crate::scrapers::topic::{Resolution, resolve};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::path::PathBuf;
use tracing::{error, info, instrument};

impl Resolution {
    /// `NotFound` ends the run as [`PipelineError::FeedNotFound`].
    pub fn into_feed_url(self) -> Result<String, PipelineError> {
        match self {
            Resolution::Resolved(url) => Ok(url),
            Resolution::NotFound => Err(PipelineError::FeedNotFound),
        }
    }
}

impl Extraction {
    /// `Empty` ends the run as [`PipelineError::NoArticles`].
    pub fn into_articles(self) -> Result<Vec<ArticleRecord>, PipelineError> {
        match self {
            Extraction::Articles(articles) if !articles.is_empty() => Ok(articles),
            Extraction::Articles(_) | Extraction::Empty => Err(PipelineError::NoArticles),
        }
    }
}

/// Clock readings taken once at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp {
    /// Snapshot date, `YYYY-MM-DD` in the configured timezone.
    pub date: String,
    /// Process clock, shown as "Last Updated" in the README.
    pub updated_at: DateTime<Utc>,
}

impl RunStamp {
    pub fn now(timezone: Tz) -> Self {
        Self::at(Utc::now(), timezone)
    }

    pub fn at(now: DateTime<Utc>, timezone: Tz) -> Self {
        Self {
            date: now.with_timezone(&timezone).format("%Y-%m-%d").to_string(),
            updated_at: now,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub feed_url: String,
    pub article_count: usize,
    /// `None` when the snapshot could not be written.
    pub snapshot_path: Option<PathBuf>,
    pub readme_updated: bool,
}

/// Run the archiver once.
///
/// # Errors
///
/// [`PipelineError::FeedNotFound`] or [`PipelineError::NoArticles`]; in
/// both cases nothing has been written.
#[instrument(level = "info", skip_all, fields(topic_url = %config.topic_url, date = %stamp.date))]
pub async fn run<F: FetchText>(
    config: &Config,
    fetcher: &F,
    stamp: &RunStamp,
) -> Result<RunReport, PipelineError> {
    println!("Target URL: {}", config.topic_url);

    let feed_url = resolve(fetcher, &config.topic_url, config.fetch_timeout)
        .await
        .into_feed_url()?;
    println!("Found RSS feed: {feed_url}");

    let articles = normalize(fetcher, &feed_url, config.max_articles)
        .await
        .into_articles()?;
    println!("Found {} articles", articles.len());

    let snapshot = ArchiveSnapshot {
        date: stamp.date.clone(),
        source_url: config.topic_url.clone(),
        articles,
    };
    let article_count = snapshot.articles.len();

    let snapshot_path = match json::write_snapshot(&config.output_dir, &snapshot).await {
        Ok(path) => path,
        Err(e) => {
            error!(error = %e, "Failed to write snapshot");
            println!("Error saving news data: {e}");
            return Ok(RunReport {
                feed_url,
                article_count,
                snapshot_path: None,
                readme_updated: false,
            });
        }
    };

    let readme_updated = match readme::update_readme(
        &config.readme_path,
        &config.output_dir,
        &snapshot,
        stamp.updated_at,
    )
    .await
    {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Failed to update README");
            println!("Error updating README: {e}");
            false
        }
    };

    println!(
        "Successfully saved {} articles for {}",
        article_count, snapshot.date
    );
    info!(article_count, path = %snapshot_path.display(), readme_updated, "Run complete");

    Ok(RunReport {
        feed_url,
        article_count,
        snapshot_path: Some(snapshot_path),
        readme_updated,
    })
}
