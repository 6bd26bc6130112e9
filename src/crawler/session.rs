//! Session scheduler: the outermost crawl loop
//!
//! Each iteration rebuilds its concurrency resources from scratch, fetches
//! the listing page, runs one pipeline per unseen story and folds the
//! successful ids into the visited set. Only the visited set crosses
//! session boundaries, and it is written exactly once per session by this
//! module alone after every pipeline has settled.

use crate::config::Config;
use crate::crawler::fetcher::{fetch_instrumented, Fetcher};
use crate::crawler::listing::{extract_top, StoryStub};
use crate::crawler::pipeline::{process_story, StoryReport};
use crate::decode::decode_html;
use crate::output::SessionStats;
use crate::CrawlError;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Story ids considered successfully processed across all past sessions
pub type VisitedSet = HashSet<String>;

/// Per-iteration resource bundle shared by every fetch task of one session
///
/// Cloning is cheap; pipelines spawned on the session's task group each
/// carry a clone.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub config: Arc<Config>,
    pub fetcher: Arc<Fetcher>,
}

impl SessionContext {
    /// Builds fresh resources for one scheduler iteration.
    pub fn new(config: Arc<Config>) -> Result<Self, CrawlError> {
        let fetcher = Arc::new(Fetcher::new(&config)?);
        Ok(Self { config, fetcher })
    }
}

/// What one session accomplished
#[derive(Debug, Default)]
pub struct SessionSummary {
    /// How many unseen stories were selected from the listing
    pub selected: usize,

    /// Reports of the pipelines that succeeded
    pub reports: Vec<StoryReport>,

    /// Captured failures, as (story id, error description)
    pub failed: Vec<(String, String)>,
}

impl SessionSummary {
    /// Ids of the stories whose pipelines succeeded.
    pub fn fresh_ids(&self) -> Vec<String> {
        self.reports.iter().map(|r| r.id.clone()).collect()
    }
}

/// Runs one complete session: listing fetch, selection, pipeline fan-out.
///
/// Individual story failures are captured inside the summary and never abort
/// their siblings. An `Err` here means the listing page itself could not be
/// obtained, which skips this iteration's processing phase - never the
/// process. The caller owns the visited set and merges `fresh_ids` after the
/// session, so a partially failed session leaves those ids eligible for the
/// next one.
pub async fn run_session(
    config: Arc<Config>,
    visited: &VisitedSet,
) -> Result<SessionSummary, CrawlError> {
    let ctx = SessionContext::new(config.clone())?;

    let (listing, _) = fetch_instrumented(&ctx.fetcher, &config.base_url).await?;
    let html = decode_html(&listing.bytes, &listing.content_type);
    let stubs: Vec<StoryStub> = extract_top(&html, &config.base_url, config.top_n)
        .into_iter()
        .filter(|stub| !visited.contains(&stub.id))
        .collect();

    let mut summary = SessionSummary {
        selected: stubs.len(),
        ..SessionSummary::default()
    };

    // Pipelines launch in listing order; completion order is unspecified
    let mut pipelines = JoinSet::new();
    for stub in stubs {
        tracing::info!(
            "Fetching story id:{} title:\"{}\" from url:{}",
            stub.id,
            stub.title,
            stub.permalink
        );
        let ctx = ctx.clone();
        pipelines.spawn(async move {
            let id = stub.id.clone();
            (id, process_story(&ctx, stub).await)
        });
    }

    while let Some(joined) = pipelines.join_next().await {
        match joined {
            Ok((_, Ok(report))) => summary.reports.push(report),
            Ok((id, Err(error))) => {
                tracing::error!("Story {} failed: {}", id, error);
                summary.failed.push((id, error.to_string()));
            }
            Err(join_error) => tracing::error!("Story pipeline panicked: {}", join_error),
        }
    }

    Ok(summary)
}

/// Runs crawl sessions forever, sleeping `restart_interval` in between.
///
/// There is no terminal state short of process shutdown; a failed listing
/// fetch only costs the current iteration. Session statistics are an
/// optional side channel - a failure to record them is logged and ignored.
pub async fn run_forever(config: Config) -> Result<(), CrawlError> {
    let config = Arc::new(config);
    let mut visited = VisitedSet::new();
    let mut session_counter: u64 = 0;

    loop {
        tracing::info!("Start crawling session {}", session_counter);

        match run_session(config.clone(), &visited).await {
            Ok(summary) => {
                let fresh = summary.fresh_ids();
                tracing::info!(
                    "+ {} fresh stories successfully received ({} failed), ids = {:?}",
                    fresh.len(),
                    summary.failed.len(),
                    fresh
                );
                visited.extend(fresh);

                let stats = SessionStats::from_summary(session_counter, &summary);
                if let Err(error) = stats.append_to(&config.output_root).await {
                    tracing::warn!("Failed to record session statistics: {}", error);
                }
            }
            Err(error) => {
                tracing::error!(
                    "Session {} could not fetch the listing page: {}",
                    session_counter,
                    error
                );
            }
        }

        tracing::info!("Stop crawling session {}", session_counter);
        tokio::time::sleep(config.restart_interval).await;
        session_counter += 1;
    }
}
