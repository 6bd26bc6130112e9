use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Listing page polled at the start of every session.
pub const DEFAULT_BASE_URL: &str = "https://news.ycombinator.com";

/// Seconds between crawl sessions.
pub const DEFAULT_RESTART_INTERVAL: f64 = 60.0;

/// How many listing rows to consider per session.
pub const DEFAULT_TOP_NEWS: usize = 10;

/// Maximum number of concurrently open requests, not to hang the host.
pub const DEFAULT_CONCURRENCY: usize = 256;

/// Per-request timeout in seconds, measured from request start.
pub const DEFAULT_REQUEST_TIMEOUT: f64 = 16.0;

/// Open request limit per host, not to be blocked by providers.
pub const DEFAULT_LIMIT_PER_HOST: usize = 8;

/// Root directory for per-story output.
pub const DEFAULT_OUTPUT_DIR: &str = "news";

/// Crawler configuration
///
/// One instance is built from the CLI at startup and shared read-only by
/// every session. Only the concurrency limiters derived from it are rebuilt
/// per session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listing site base URL; story permalinks and comment hrefs resolve
    /// against it
    pub base_url: Url,

    /// Pause between the end of one session and the start of the next
    pub restart_interval: Duration,

    /// Number of listing rows considered per session, in document order
    pub top_n: usize,

    /// Global cap on simultaneously open requests within one session
    pub concurrency: usize,

    /// Per-request timeout; expiry cancels only the timed-out request
    pub timeout: Duration,

    /// Cap on simultaneously open requests to any single host
    pub per_host_limit: usize,

    /// Directory receiving one subdirectory per story id
    pub output_root: PathBuf,
}

impl Config {
    /// Returns the discussion page URL for a story id.
    pub fn comments_url(&self, story_id: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("item?id={story_id}"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            restart_interval: Duration::from_secs_f64(DEFAULT_RESTART_INTERVAL),
            top_n: DEFAULT_TOP_NEWS,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT),
            per_host_limit: DEFAULT_LIMIT_PER_HOST,
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}
