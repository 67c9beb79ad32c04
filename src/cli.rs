//! Command-line interface definitions for the Google News archiver.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can be provided via a command-line flag or an environment
//! variable, so a scheduled job can configure the run without arguments.

use chrono_tz::Tz;
use clap::Parser;
use url::Url;

/// Default Google News topic page.
pub const DEFAULT_TOPIC_URL: &str = "https://news.google.com/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pWVXlnQVAB?ceid=US:en&oc=3";

/// Browser-like User-Agent; the topic page rejects unidentified clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Command-line arguments for the archiver.
///
/// # Examples
///
/// ```sh
/// # Defaults: archive into ./news and rewrite ./README.md
/// google_news_archive
///
/// # Different topic, keep at most 10 articles
/// NEWS_URL="https://news.google.com/topics/..." google_news_archive -n 10
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Google News topic page to discover the feed from
    #[arg(long, env = "NEWS_URL", default_value = DEFAULT_TOPIC_URL, value_parser = parse_topic_url)]
    pub topic_url: String,

    /// Directory holding the daily JSON snapshots
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "news")]
    pub output_dir: String,

    /// Maximum number of articles kept per snapshot
    #[arg(short = 'n', long, env = "MAX_ARTICLES", default_value_t = 20)]
    pub max_articles: usize,

    /// Markdown index rewritten after each run
    #[arg(short, long, env = "README_PATH", default_value = "README.md")]
    pub readme: String,

    /// IANA timezone used to date the snapshot
    #[arg(long, env = "NEWS_TIMEZONE", default_value = "Asia/Shanghai", value_parser = parse_timezone)]
    pub timezone: Tz,

    /// Timeout for the topic page request, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// User-Agent sent with the topic page request
    #[arg(long, env = "NEWS_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

fn parse_topic_url(s: &str) -> Result<String, String> {
    Url::parse(s)
        .map(|_| s.to_string())
        .map_err(|e| format!("invalid topic URL: {e}"))
}

fn parse_timezone(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>()
        .map_err(|e| format!("unknown timezone `{s}`: {e}"))
}

/// Parse `args` with every environment override switched off.
#[cfg(test)]
pub(crate) fn try_parse_without_env<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    use clap::{CommandFactory, FromArgMatches};

    let matches = Cli::command()
        .mut_args(|arg| arg.env(None::<&'static str>))
        .try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}
