//! Configuration module for ycrawler
//!
//! All knobs are simple scalars fixed at startup by the CLI; there is no
//! dynamic reconfiguration while the crawl loop runs. Validation happens
//! once, before the loop begins, and is the only fatal failure path.

mod types;
mod validation;

// Re-export types and defaults
pub use types::{
    Config, DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_LIMIT_PER_HOST, DEFAULT_OUTPUT_DIR,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESTART_INTERVAL, DEFAULT_TOP_NEWS,
};

pub use validation::validate;
