//! Run configuration passed into the pipeline.

use crate::cli::{Cli, DEFAULT_TOPIC_URL, DEFAULT_USER_AGENT};
use chrono_tz::Tz;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a run needs to know, resolved once at startup.
///
/// The [`Default`] impl carries the documented defaults:
///
/// | Option | Default |
/// |--------|---------|
/// | `topic_url` | the US top-stories topic page |
/// | `output_dir` | `news` |
/// | `readme_path` | `README.md` |
/// | `max_articles` | 20 |
/// | `timezone` | `Asia/Shanghai` |
/// | `fetch_timeout` | 30 seconds |
#[derive(Debug, Clone)]
pub struct Config {
    pub topic_url: String,
    pub output_dir: PathBuf,
    pub readme_path: PathBuf,
    pub max_articles: usize,
    pub timezone: Tz,
    pub fetch_timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topic_url: DEFAULT_TOPIC_URL.to_string(),
            output_dir: PathBuf::from("news"),
            readme_path: PathBuf::from("README.md"),
            max_articles: 20,
            timezone: chrono_tz::Asia::Shanghai,
            fetch_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            topic_url: cli.topic_url,
            output_dir: PathBuf::from(cli.output_dir),
            readme_path: PathBuf::from(cli.readme),
            max_articles: cli.max_articles,
            timezone: cli.timezone,
            fetch_timeout: Duration::from_secs(cli.timeout_secs),
            user_agent: cli.user_agent,
        }
    }
}

impl Config {
    /// Headers sent with every request.
    pub fn headers(&self) -> Result<HeaderMap, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        Ok(headers)
    }
}
