//! HTTP transport behind a small trait seam.
//!
//! The resolver and normalizer only need "give me the body of this URL as
//! text". [`FetchText`] captures that, [`HttpFetcher`] implements it with
//! `reqwest`, and tests swap in an in-memory implementation.

use reqwest::Client;
use reqwest::header::HeaderMap;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Fetch a URL and return its body as text.
pub trait FetchText {
    /// Perform a single GET.
    ///
    /// Non-success statuses are errors. `timeout`, when set, bounds the
    /// whole request.
    async fn fetch_text(&self, url: &str, timeout: Option<Duration>)
    -> Result<String, Box<dyn Error>>;
}

/// [`FetchText`] over a shared `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher that sends `headers` with every request.
    pub fn new(headers: HeaderMap) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

impl FetchText for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_text(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?.error_for_status()?;
        let status = response.status();
        let body = response.text().await?;
        debug!(
            %status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched"
        );
        Ok(body)
    }
}
