//! Utility functions for text excerpts, log previews and output directories.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Length, in characters, of the summary excerpt shown in the README.
pub const EXCERPT_CHARS: usize = 150;

/// First [`EXCERPT_CHARS`] characters of `summary` followed by `"..."`.
///
/// The ellipsis is always appended, even when the summary is shorter.
/// Markup is left as-is.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(excerpt("short"), "short...");
/// ```
pub fn excerpt(summary: &str) -> String {
    let mut out: String = summary.chars().take(EXCERPT_CHARS).collect();
    out.push_str("...");
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a scratch file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let scratch_path = path.join("..__write_check__");
    fs::write(&scratch_path, b"").await?;
    let _ = fs::remove_file(&scratch_path).await;
    info!("Output directory is writable");
    Ok(())
}
