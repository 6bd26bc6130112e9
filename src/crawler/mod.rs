//! Core crawl machinery
//!
//! This module contains the bounded fetcher, the listing and comment-link
//! extractors, the per-story pipeline and the recurring session loop that
//! ties them together.

mod comments;
mod fetcher;
mod listing;
mod pipeline;
mod session;

pub use comments::extract_links;
pub use fetcher::{
    build_http_client, fetch_instrumented, FetchTiming, FetchedPage, Fetcher, HostLimiter,
};
pub use listing::{extract_top, StoryStub};
pub use pipeline::{process_story, CommentOutcome, StoryReport};
pub use session::{run_forever, run_session, SessionContext, SessionSummary, VisitedSet};
