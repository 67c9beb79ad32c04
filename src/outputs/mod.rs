//! Output generation for the archive.
//!
//! # Submodules
//!
//! - [`json`]: Writes the day's `ArchiveSnapshot` as JSON
//! - [`readme`]: Regenerates the Markdown index over all snapshots
//!
//! # Output Structure
//!
//! ```text
//! README.md                          # Top stories + history table
//! news/
//! ├── google-news-2025-05-05.json
//! └── google-news-2025-05-06.json
//! ```

pub mod json;
pub mod readme;
