//! Ollama completion client with exponential backoff retry logic.
//!
//! The vocabulary stage sends the cleaned lyrics to an Ollama-compatible
//! `/api/generate` endpoint and gets free text back. The model's reply is
//! untrusted; it goes straight to the strict parser in [`crate::vocab`].
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait for sending a prompt and getting text back
//! - [`OllamaClient`]: HTTP transport speaking Ollama's generate API
//! - [`RetryAsk`]: decorator adding retry with exponential backoff and jitter
//!
//! # Retry Strategy
//!
//! - Maximum 3 retry attempts
//! - Exponential backoff starting at 1 second, capped at 30 seconds
//! - Random jitter (0-250ms) added to each delay

use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Trait for async prompt/completion interaction.
pub trait AskAsync {
    type Response;

    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// HTTP client for an Ollama-compatible completion endpoint.
#[derive(Debug)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Local model inference is slow; give the request plenty of room.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

    pub fn new(base_url: &str, model: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

impl AskAsync for OllamaClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt: text,
            stream: false,
        };

        let result: Result<GenerateResponse, reqwest::Error> = async {
            self.http
                .post(&url)
                .json(&request)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        }
        .await;

        let dt = t0.elapsed();
        match result {
            Ok(body) => {
                info!(elapsed_ms = dt.as_millis() as u128, bytes = body.response.len(), "model call succeeded");
                Ok(body.response)
            }
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "model call failed");
                Err(Box::new(e))
            }
        }
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`]
/// implementation.
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<'a, T> {
    inner: &'a T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<'a, T> RetryAsk<'a, T>
where
    T: AskAsync,
{
    pub fn new(inner: &'a T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryAsk<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<'_, T>
where
    T: AskAsync,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Send a prompt to the model with backoff retry.
#[instrument(level = "info", skip_all)]
pub async fn ask_with_backoff(client: &OllamaClient, prompt: &str) -> Result<String, Box<dyn Error>> {
    let t0 = Instant::now();
    let api = RetryAsk::new(client, 3, Duration::from_secs(1));
    let res = api.ask(prompt).await;
    let dt = t0.elapsed();

    match &res {
        Ok(_) => info!(
            elapsed_ms_total = dt.as_millis() as u128,
            "ask_with_backoff succeeded"
        ),
        Err(e) => {
            error!(elapsed_ms_total = dt.as_millis() as u128, error = %e, "ask_with_backoff failed")
        }
    }
    res
}

/// Render the vocabulary-extraction prompt for a set of lyrics.
///
/// The strict output format here is load-bearing: the parser in
/// [`crate::vocab`] keeps only lines matching it exactly.
pub fn vocabulary_prompt(lyrics: &str) -> String {
    format!(
        "You are a French language teacher. I will give you French song lyrics, \
         and I want you to help students learn vocabulary from them.\n\
         \n\
         Instructions:\n\
         1. Identify 5-10 important French words or phrases from the lyrics\n\
         2. For each word:\n\
         \x20  - Provide the English translation\n\
         \x20  - Include the exact line from the lyrics where it appears\n\
         3. Format each word EXACTLY like this, one per line:\n\
         \x20  word | translation | context\n\
         4. Do not include any other text in your response\n\
         \n\
         Example format:\n\
         danser | to dance | Je danse avec le vent\n\
         coeur | heart | Mon coeur bat pour toi\n\
         \n\
         Here are the lyrics to analyze:\n\
         {lyrics}"
    )
}
