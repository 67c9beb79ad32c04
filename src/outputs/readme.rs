//! The Markdown index rewritten after every run.
//!
//! Layout:
//!
//! ```text
//! # Google News Daily Archive
//!
//! **Last Updated**: 2025-05-06 08:00:00 (UTC)
//!
//! ## Today's Top News (2025-05-06)
//!
//! 1. [Title](link) - *Source*
//!    > first 150 characters of the summary...
//!
//! [View all articles for 2025-05-06](news/google-news-2025-05-06.json)
//!
//! ## Historical Data
//! | Date | Articles | View |
//! |------|----------|------|
//! | 2025-05-06 | 20 articles | [View](news/google-news-2025-05-06.json) |
//! ```
//!
//! The file is replaced wholesale each run.

use crate::models::ArchiveSnapshot;
use crate::outputs::json::{article_count, snapshot_date, snapshot_file_name};
use crate::utils::excerpt;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Number of articles featured at the top of the README.
pub const TOP_ARTICLES: usize = 5;

/// One row of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub date: String,
    pub article_count: usize,
    /// Link target, relative to the README when `output_dir` is relative.
    pub path: String,
}

/// List every snapshot in `output_dir`, newest file name first.
///
/// Files that cannot be read or parsed are logged and left out.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn collect_history(output_dir: &Path) -> Result<Vec<HistoryRow>, Box<dyn Error>> {
    let mut names = Vec::new();
    let mut dir = fs::read_dir(output_dir).await?;
    while let Some(item) = dir.next_entry().await? {
        if let Some(name) = item.file_name().to_str() {
            if snapshot_date(name).is_some() {
                names.push(name.to_string());
            }
        }
    }
    names.sort_unstable_by(|a, b| b.cmp(a));

    let mut rows = Vec::with_capacity(names.len());
    for name in names {
        let path = output_dir.join(&name);
        match article_count(&path).await {
            Ok(count) => rows.push(HistoryRow {
                date: snapshot_date(&name).unwrap_or_default().to_string(),
                article_count: count,
                path: path.display().to_string(),
            }),
            Err(e) => warn!(file = %name, error = %e, "Skipping unreadable snapshot"),
        }
    }
    info!(snapshots = rows.len(), "Collected history");
    Ok(rows)
}

/// Render the README for the current run.
pub fn render_readme(
    snapshot: &ArchiveSnapshot,
    history: &[HistoryRow],
    updated_at: DateTime<Utc>,
    output_dir: &Path,
) -> String {
    let mut md = String::new();
    let date = &snapshot.date;

    md.push_str("# Google News Daily Archive\n\n");
    let _ = writeln!(
        md,
        "**Last Updated**: {} (UTC)\n",
        updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(md, "## Today's Top News ({date})\n");

    for (i, article) in snapshot.articles.iter().take(TOP_ARTICLES).enumerate() {
        let _ = writeln!(
            md,
            "{}. [{}]({}) - *{}*",
            i + 1,
            article.title,
            article.link,
            article.source
        );
        let _ = writeln!(md, "   > {}\n", excerpt(&article.summary));
    }

    let json_link = output_dir.join(snapshot_file_name(date));
    let _ = writeln!(
        md,
        "\n[View all articles for {date}]({})\n",
        json_link.display()
    );
    md.push_str("## Historical Data\n");
    md.push_str("| Date | Articles | View |\n");
    md.push_str("|------|----------|------|\n");
    for row in history {
        let _ = writeln!(
            md,
            "| {} | {} articles | [View]({}) |",
            row.date, row.article_count, row.path
        );
    }
    md
}

/// Rebuild the README at `readme_path` from the snapshot directory.
#[instrument(level = "info", skip_all, fields(readme = %readme_path.display(), date = %snapshot.date))]
pub async fn update_readme(
    readme_path: &Path,
    output_dir: &Path,
    snapshot: &ArchiveSnapshot,
    updated_at: DateTime<Utc>,
) -> Result<(), Box<dyn Error>> {
    let history = collect_history(output_dir).await?;
    let md = render_readme(snapshot, &history, updated_at, output_dir);
    fs::write(readme_path, md).await?;
    info!("Updated README");
    Ok(())
}
