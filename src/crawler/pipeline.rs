//! Story pipeline: one story page plus the fan-out of its comment links
//!
//! Ordering within a story is fixed: the story's own page is fetched and
//! saved first, then the discussion page, and only then the comment links
//! discovered in it, concurrently. The story's own page must succeed;
//! comment links are best effort and a failing link only shows up as a
//! failed outcome in the report.

use crate::crawler::comments::extract_links;
use crate::crawler::fetcher::{fetch_instrumented, Fetcher};
use crate::crawler::listing::StoryStub;
use crate::crawler::session::SessionContext;
use crate::decode::decode_html;
use crate::persist;
use crate::CrawlError;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use url::Url;

/// Outcome of one comment-link fetch-and-persist
#[derive(Debug)]
pub enum CommentOutcome {
    /// The linked page was saved
    Saved { url: Url, path: PathBuf },

    /// The link failed; the error is recorded, never propagated
    Failed { url: Url, error: String },
}

/// Result record for one fully processed story
///
/// Built and returned by the pipeline itself; the session scheduler
/// aggregates these after joining, so no shared statistics state exists.
#[derive(Debug)]
pub struct StoryReport {
    /// Story id, as taken from the listing row
    pub id: String,

    /// Headline text
    pub title: String,

    /// Where the story's own page landed on disk
    pub story_file: PathBuf,

    /// Per-link outcomes of the comment fan-out
    pub comments: Vec<CommentOutcome>,
}

impl StoryReport {
    /// Number of comment links that were saved.
    pub fn comments_saved(&self) -> usize {
        self.comments
            .iter()
            .filter(|c| matches!(c, CommentOutcome::Saved { .. }))
            .count()
    }

    /// Number of comment links that failed.
    pub fn comments_failed(&self) -> usize {
        self.comments.len() - self.comments_saved()
    }
}

/// Processes one story end to end.
///
/// Creates `{output_root}/{id}` (idempotent), saves the story's own page
/// with the `story` prefix, then fetches the discussion page and saves every
/// distinct linked page with the `comment` prefix. An error from the story
/// page or the discussion page fails the pipeline, which withholds the id
/// from the visited set so the story is naturally retried next session.
pub async fn process_story(
    ctx: &SessionContext,
    stub: StoryStub,
) -> Result<StoryReport, CrawlError> {
    let dir = ctx.config.output_root.join(&stub.id);
    tokio::fs::create_dir_all(&dir).await?;

    let (page, _) = fetch_instrumented(&ctx.fetcher, &stub.permalink).await?;
    let story_file =
        persist::save(&page.bytes, &dir, &page.url, &page.content_type, "story").await?;

    let discussion_url = ctx.config.comments_url(&stub.id)?;
    let (discussion, _) = fetch_instrumented(&ctx.fetcher, &discussion_url).await?;
    let html = decode_html(&discussion.bytes, &discussion.content_type);
    let links = extract_links(&html, &ctx.config.base_url);

    tracing::info!(
        "Story id:{} title:\"{}\" has {} distinct comment links",
        stub.id,
        stub.title,
        links.len()
    );

    // Fan out one task per distinct link; the session's limiters bound how
    // many are actually on the wire at once. The group is joined before the
    // story reports completion.
    let mut tasks = JoinSet::new();
    for url in links {
        let fetcher = ctx.fetcher.clone();
        let dir = dir.clone();
        tasks.spawn(async move {
            match save_comment_link(&fetcher, &dir, &url).await {
                Ok(path) => CommentOutcome::Saved { url, path },
                Err(error) => {
                    tracing::warn!("Comment link [{}] failed: {}", url, error);
                    CommentOutcome::Failed {
                        url,
                        error: error.to_string(),
                    }
                }
            }
        });
    }

    let mut comments = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => comments.push(outcome),
            Err(join_error) => {
                tracing::error!("Comment task for story {} panicked: {}", stub.id, join_error);
            }
        }
    }

    Ok(StoryReport {
        id: stub.id,
        title: stub.title,
        story_file,
        comments,
    })
}

/// Fetches one comment link under the session limits and persists it.
async fn save_comment_link(
    fetcher: &Fetcher,
    dir: &Path,
    url: &Url,
) -> Result<PathBuf, CrawlError> {
    let (page, _) = fetch_instrumented(fetcher, url).await?;
    let path = persist::save(&page.bytes, dir, &page.url, &page.content_type, "comment").await?;
    Ok(path)
}
