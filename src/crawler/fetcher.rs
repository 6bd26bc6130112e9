//! Bounded HTTP fetcher
//!
//! Every request must hold two permits before it goes on the wire: one from
//! the session-wide concurrency limiter and one from the limiter of the
//! target host. Both are released when the request settles, success or
//! failure alike. The per-host cap keeps the crawler from hammering one
//! origin while the global cap bounds aggregate open requests; the comment
//! fan-out targets many distinct hosts but the listing host is hit
//! repeatedly, so the two compose rather than replace each other.

use crate::config::Config;
use crate::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// A fully received response body with its declared content type
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Raw response body
    pub bytes: Vec<u8>,

    /// Content-Type header value as declared by the server
    pub content_type: String,

    /// The URL this page was fetched from
    pub url: Url,
}

/// Timing and size of one completed fetch
#[derive(Debug, Clone, Copy)]
pub struct FetchTiming {
    /// Wall time from request start to the last body byte
    pub elapsed: Duration,

    /// Body size in bytes
    pub bytes: usize,
}

/// Caps the number of simultaneously open requests to any single host
///
/// Semaphores are created lazily per host and live for one session only, so
/// a leaked slot cannot accumulate across sessions.
#[derive(Debug)]
pub struct HostLimiter {
    limit: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HostLimiter {
    /// Creates a limiter allowing `limit` open requests per host.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    /// Suspends until the host has a free slot, then returns its permit.
    pub async fn acquire(&self, host: &str) -> OwnedSemaphorePermit {
        let semaphore = {
            let mut hosts = self.hosts.lock().unwrap();
            hosts
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.limit)))
                .clone()
        };
        // The semaphores are never closed
        semaphore
            .acquire_owned()
            .await
            .expect("host limiter semaphore closed")
    }

    /// Free slots currently available for a host.
    pub fn available_permits(&self, host: &str) -> usize {
        let hosts = self.hosts.lock().unwrap();
        hosts
            .get(host)
            .map(|s| s.available_permits())
            .unwrap_or(self.limit)
    }
}

/// One session's fetch resources: HTTP client, global limiter, per-host
/// limiter and the per-request timeout
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    global: Arc<Semaphore>,
    per_host: HostLimiter,
    timeout: Duration,
}

impl Fetcher {
    /// Builds a fresh fetcher for one session.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client()?,
            global: Arc::new(Semaphore::new(config.concurrency)),
            per_host: HostLimiter::new(config.per_host_limit),
            timeout: config.timeout,
        })
    }

    /// Performs one GET under both concurrency caps and the request timeout.
    ///
    /// Suspends until both limiters have capacity. A timeout or transport
    /// failure affects only this request; sibling requests keep their slots
    /// and the permits held here are released when the future settles.
    /// Non-2xx statuses are failures and are never retried here - a story
    /// that failed is simply selected again next session.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let _global = self
            .global
            .clone()
            .acquire_owned()
            .await
            .expect("global limiter semaphore closed");
        let host = url.host_str().unwrap_or_default();
        let _host = self.per_host.acquire(host).await;

        tracing::trace!(
            "Fetching {} ({} global slots left)",
            url,
            self.global.available_permits()
        );

        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = response.bytes().await.map_err(|e| classify(url, e))?;

        Ok(FetchedPage {
            bytes: bytes.to_vec(),
            content_type,
            url: url.clone(),
        })
    }

    /// Free slots currently available on the global limiter.
    pub fn available_permits(&self) -> usize {
        self.global.available_permits()
    }
}

/// Instrumented wrapper around [`Fetcher::fetch`]
///
/// Composed around the fetch call at the point of use instead of mutating
/// shared counters; the timing travels back alongside the payload.
pub async fn fetch_instrumented(
    fetcher: &Fetcher,
    url: &Url,
) -> Result<(FetchedPage, FetchTiming), FetchError> {
    let started = Instant::now();
    let page = fetcher.fetch(url).await?;
    let timing = FetchTiming {
        elapsed: started.elapsed(),
        bytes: page.bytes.len(),
    };
    tracing::debug!(
        "Fetched {} in {:?} ({} bytes)",
        url,
        timing.elapsed,
        timing.bytes
    );
    Ok((page, timing))
}

/// Builds the session HTTP client
///
/// A static browser-like header set goes on every request, and no cookie
/// store is installed so each request is independent. Redirects follow
/// reqwest's default policy; comment links point at arbitrary hosts and
/// frequently redirect.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .default_headers(default_headers())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Static browser-like headers attached to every request.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
             image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9,ru;q=0.8"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/91.0.4472.101 Safari/537.36",
        ),
    );
    headers
}

/// Maps a reqwest transport error onto the fetch taxonomy.
fn classify(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Connection {
            url: url.to_string(),
            source: error,
        }
    }
}
