//! mindicador.cl integration: one indicator-year series per request.
//!
//! The client layers three behaviours on top of a raw [`SeriesSource`]:
//!
//! - a per-key debounce so rapid UI interaction does not hammer the API
//! - bounded exponential-backoff retries for transient failures
//! - cooperative cancellation through a session-wide [`CancelToken`]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::data::cache::{self, SeriesKey, SharedCache};
use crate::data::cancel::CancelToken;
use crate::domain::{Indicator, RawSample};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://mindicador.cl/api";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "ECON_API_BASE";

/// Upper bound for one exchange. A session waits on its in-flight request
/// before a superseding one can start, so this stays short.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Raw transport for `GET {base}/{code}/{year}`.
///
/// `Err` means the exchange itself failed (DNS, TLS, reset, timeout); any
/// HTTP status, including errors, comes back as `Ok`.
pub trait SeriesSource: Send + Sync {
    fn get(&self, code: &str, year: i32) -> Result<HttpReply, AppError>;
}

/// Blocking reqwest transport against the public API.
pub struct MindicadorSource {
    client: Client,
    base_url: String,
}

impl MindicadorSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| AppError::fatal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL from `.env` / environment, falling back to the public endpoint.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SeriesSource for MindicadorSource {
    fn get(&self, code: &str, year: i32) -> Result<HttpReply, AppError> {
        let url = format!("{}/{code}/{year}", self.base_url);
        debug!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::transient(format!("Request to {url} failed: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| AppError::transient(format!("Failed to read body from {url}: {e}")))?;
        Ok(HttpReply { status, body })
    }
}

/// Result of a fetch that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Samples for the year, newest first. Empty means the API has no data.
    Series(Vec<RawSample>),
    /// Debounced with nothing cached to hand back.
    Skipped,
    /// The session token was triggered.
    Cancelled,
}

/// Retry and debounce knobs.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before retry `n` is `base_delay * 2^n`.
    pub base_delay: Duration,
    /// Minimum spacing between network calls for the same key.
    pub debounce: Duration,
}

impl RetryPolicy {
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            debounce: Duration::from_millis(1000),
        }
    }
}

pub struct FetchClient {
    source: Box<dyn SeriesSource>,
    cache: SharedCache,
    policy: RetryPolicy,
    last_fetch: Mutex<HashMap<SeriesKey, Instant>>,
}

impl FetchClient {
    pub fn new(source: Box<dyn SeriesSource>, cache: SharedCache) -> Self {
        Self::with_policy(source, cache, RetryPolicy::default())
    }

    pub fn with_policy(source: Box<dyn SeriesSource>, cache: SharedCache, policy: RetryPolicy) -> Self {
        Self {
            source,
            cache,
            policy,
            last_fetch: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch one year of `indicator`.
    ///
    /// `year` is not checked against `indicator.earliest_year`; callers resolve
    /// the valid range first.
    pub fn fetch_year(
        &self,
        indicator: &Indicator,
        year: i32,
        token: &CancelToken,
    ) -> Result<FetchOutcome, AppError> {
        if token.is_cancelled() {
            return Ok(FetchOutcome::Cancelled);
        }

        let code = indicator.code;
        let key: SeriesKey = (code.to_string(), year);
        let now = Instant::now();

        {
            let mut last = self.last_fetch.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(prev) = last.get(&key) {
                if now.saturating_duration_since(*prev) < self.policy.debounce {
                    let cached = cache::lock(&self.cache).series.get(&key);
                    debug!(code, year, hit = cached.is_some(), "debounced fetch");
                    return Ok(cached.map_or(FetchOutcome::Skipped, FetchOutcome::Series));
                }
            }
            last.insert(key.clone(), now);
        }

        if let Some(series) = cache::lock(&self.cache).series.get(&key) {
            debug!(code, year, n = series.len(), "series cache hit");
            return Ok(FetchOutcome::Series(series));
        }

        let mut attempt = 0u32;
        loop {
            let reply = self.source.get(code, year);

            // Observe cancellation before acting on whatever came back.
            if token.is_cancelled() {
                info!(code, year, "fetch cancelled");
                return Ok(FetchOutcome::Cancelled);
            }

            let failure = match reply {
                Ok(reply) if reply.status == 404 => {
                    warn!(code, year, "no data (404)");
                    self.store(key, Vec::new(), now);
                    return Ok(FetchOutcome::Series(Vec::new()));
                }
                Ok(reply) if (200..300).contains(&reply.status) => {
                    let samples = parse_series(&reply.body)
                        .map_err(|e| AppError::malformed(format!("{code} {year}: {e}")))?;
                    if samples.is_empty() {
                        warn!(code, year, "empty series");
                    }
                    self.store(key, samples.clone(), now);
                    return Ok(FetchOutcome::Series(samples));
                }
                Ok(reply) => format!("HTTP {}", reply.status),
                Err(err) => err.to_string(),
            };

            if attempt >= self.policy.max_retries {
                warn!(code, year, %failure, "giving up after {} attempts", attempt + 1);
                return Err(AppError::transient(format!(
                    "Failed to fetch {code} for {year}: {failure}"
                )));
            }

            let delay = self.policy.delay(attempt);
            info!(code, year, %failure, delay_ms = delay.as_millis() as u64, "retrying");
            if !token.sleep(delay) {
                info!(code, year, "fetch cancelled during backoff");
                return Ok(FetchOutcome::Cancelled);
            }
            attempt += 1;
        }
    }

    fn store(&self, key: SeriesKey, samples: Vec<RawSample>, fetched_at: Instant) {
        cache::lock(&self.cache).series.insert_at(key, samples, fetched_at);
    }
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    serie: Option<Vec<RawSample>>,
}

/// Decode a `{"serie": [...]}` body. A missing or null `serie` is an empty series.
pub fn parse_series(body: &str) -> Result<Vec<RawSample>, String> {
    let parsed: SeriesResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid series payload: {e}"))?;
    Ok(parsed.serie.unwrap_or_default())
}
