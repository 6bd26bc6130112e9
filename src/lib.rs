//! ycrawler: an unattended Hacker News mirror
//!
//! This crate implements a long-running crawler that polls the front page on
//! a fixed interval, downloads the top N not-yet-seen story pages together
//! with every page linked from their comment threads, and writes the raw
//! bytes to a per-story directory on disk.

pub mod config;
pub mod crawler;
pub mod decode;
pub mod output;
pub mod persist;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by a single HTTP fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {code} for {url}")]
    Status { url: String, code: u16 },

    #[error("Connection error for {url}: {source}")]
    Connection { url: String, source: reqwest::Error },
}

/// Errors produced while writing a downloaded page to disk
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration-specific errors; the only class that is fatal, and only
/// before the crawl loop starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Fetcher, SessionContext, StoryStub};
