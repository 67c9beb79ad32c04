//! # Google News Archive
//!
//! A scheduled batch job that archives a Google News topic as dated JSON
//! snapshots and keeps a Markdown index of them up to date.
//!
//! ## Usage
//!
//! ```sh
//! google_news_archive -o ./news -r ./README.md
//! ```
//!
//! ## Architecture
//!
//! Each invocation runs once, sequentially:
//! 1. **Discovery**: find the feed endpoint advertised by the topic page
//! 2. **Normalization**: parse the feed into at most `max_articles` records
//! 3. **Output**: write `google-news-<date>.json` and regenerate the README
//!
//! Exit status is 0 on success and 1 when no feed or no articles were found.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod http;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::Config;
use http::HttpFetcher;
use pipeline::RunStamp;

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    println!("Starting Google News scraper...");

    let config = Config::from(Cli::parse());
    debug!(?config, "Resolved configuration");

    let fetcher = match config.headers().and_then(HttpFetcher::new) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            println!("Failed to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stamp = RunStamp::now(config.timezone);
    let result = pipeline::run(&config, &fetcher, &stamp).await;

    let elapsed = start_time.elapsed();
    match result {
        Ok(report) => {
            info!(
                ?elapsed,
                feed_url = %report.feed_url,
                articles = report.article_count,
                saved = report.snapshot_path.is_some(),
                readme_updated = report.readme_updated,
                "Execution complete"
            );
            println!("Scraping completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(?elapsed, error = %e, "Run aborted");
            println!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
