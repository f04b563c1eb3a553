//! HTTP fetching of candidate lyrics pages.
//!
//! One [`PageFetcher`] serves one pipeline run. It sends browser-like
//! headers, bounds every request with the configured timeout, and enforces
//! a minimum delay between successive fetches so rate-limit-sensitive lyric
//! sites are not hammered while the candidate loop walks its list.
//!
//! The delay is an awaited sleep behind the [`Sleeper`] trait, so tests can
//! substitute a recorder and run without wall-clock waits.

use crate::config::PipelineConfig;
use crate::error::FetchError;
use crate::models::FetchedPage;
use chrono::Local;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Sleep strategy used for inter-request throttling.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Default sleeper backed by the tokio timer.
#[derive(Debug, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Fetches raw HTML for candidate URLs, one request in flight at a time.
///
/// Stateless apart from the throttle timestamp; nothing is persisted.
#[derive(Debug)]
pub struct PageFetcher<S: Sleeper = TokioSleeper> {
    client: reqwest::Client,
    timeout: Duration,
    min_delay: Duration,
    min_body_len: usize,
    last_request: Mutex<Option<Instant>>,
    sleeper: S,
}

impl PageFetcher<TokioSleeper> {
    pub fn new(config: &PipelineConfig) -> Result<Self, reqwest::Error> {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<S: Sleeper> PageFetcher<S> {
    pub fn with_sleeper(config: &PipelineConfig, sleeper: S) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            client,
            timeout: config.fetch_timeout,
            min_delay: config.fetch_delay,
            min_body_len: config.min_body_len,
            last_request: Mutex::new(None),
            sleeper,
        })
    }

    /// Fetch one candidate URL.
    ///
    /// Waits out the inter-request delay first, then rejects non-2xx
    /// responses and bodies too short to plausibly contain lyrics.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.throttle().await;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Request(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Request(e)
            }
        })?;

        if !status.is_success() || body.len() < self.min_body_len {
            warn!(%url, status = status.as_u16(), body_len = body.len(), "rejecting response");
            return Err(FetchError::Invalid {
                status: status.as_u16(),
                body_len: body.len(),
            });
        }

        info!(%url, status = status.as_u16(), bytes = body.len(), "fetched page");
        Ok(FetchedPage {
            source_url: url.to_string(),
            raw_html: body,
            status_code: status.as_u16(),
            fetched_at: Local::now(),
        })
    }

    /// Enforce the minimum delay since the previous fetch in this run.
    pub async fn throttle(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.min_delay {
                let wait = self.min_delay - elapsed;
                debug!(?wait, "throttling before next fetch");
                self.sleeper.sleep(wait).await;
            }
        }
        *last_request = Some(Instant::now());
    }
}
