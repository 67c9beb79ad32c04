//! JSON snapshot files.
//!
//! One file per calendar day:
//! ```text
//! output_dir/
//! ├── google-news-2025-05-06.json
//! └── google-news-2025-05-07.json
//! ```
//!
//! Re-running on the same day overwrites that day's file.

use crate::models::ArchiveSnapshot;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// File name prefix shared by all snapshots.
pub const SNAPSHOT_PREFIX: &str = "google-news-";

/// File name suffix shared by all snapshots.
pub const SNAPSHOT_SUFFIX: &str = ".json";

/// `google-news-<date>.json`
pub fn snapshot_file_name(date: &str) -> String {
    format!("{SNAPSHOT_PREFIX}{date}{SNAPSHOT_SUFFIX}")
}

/// The date embedded in a snapshot file name, if it is one.
pub fn snapshot_date(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(SNAPSHOT_PREFIX)?
        .strip_suffix(SNAPSHOT_SUFFIX)
}

/// Write `snapshot` to `{output_dir}/google-news-{date}.json`.
///
/// Creates `output_dir` if needed and checks it is writable. The JSON is
/// indented with two spaces and keeps non-ASCII characters as-is.
///
/// # Returns
///
/// The path written.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), date = %snapshot.date))]
pub async fn write_snapshot(
    output_dir: &Path,
    snapshot: &ArchiveSnapshot,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(error = %e, "Snapshot directory is not writable");
        return Err(e);
    }

    let path = output_dir.join(snapshot_file_name(&snapshot.date));
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = snapshot.articles.len(), "Wrote snapshot");
    Ok(path)
}

/// Number of entries in a snapshot file's `articles` array.
#[instrument(level = "debug")]
pub async fn article_count(path: &Path) -> Result<usize, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    value["articles"]
        .as_array()
        .map(Vec::len)
        .ok_or_else(|| format!("{} has no `articles` array", path.display()).into())
}
