//! Per-session statistics records
//!
//! One JSON line per session is appended to `sessions.jsonl` under the
//! output root. The record is built from the values the pipelines returned,
//! not from shared mutable state, and any error in this side channel is
//! logged by the caller and otherwise ignored.

use crate::crawler::SessionSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// File receiving one JSON record per completed session.
const SESSIONS_FILE: &str = "sessions.jsonl";

/// Per-story entry in the session record
#[derive(Debug, Serialize)]
pub struct StoryStat {
    pub id: String,
    pub comment_links: usize,
    pub comment_failures: usize,
}

/// Summary record for one completed session
#[derive(Debug, Serialize)]
pub struct SessionStats {
    /// Session counter since process start
    pub session: u64,

    /// When the record was written
    pub at: DateTime<Utc>,

    /// Unseen stories selected from the listing
    pub selected: usize,

    /// Stories whose pipelines succeeded
    pub succeeded: usize,

    /// Stories whose pipelines failed
    pub failed: usize,

    /// Ids folded into the visited set this session
    pub ids: Vec<String>,

    /// Per-story comment fan-out counts
    pub stories: Vec<StoryStat>,
}

impl SessionStats {
    /// Builds the record from one session's aggregated results.
    pub fn from_summary(session: u64, summary: &SessionSummary) -> Self {
        Self {
            session,
            at: Utc::now(),
            selected: summary.selected,
            succeeded: summary.reports.len(),
            failed: summary.failed.len(),
            ids: summary.fresh_ids(),
            stories: summary
                .reports
                .iter()
                .map(|report| StoryStat {
                    id: report.id.clone(),
                    comment_links: report.comments.len(),
                    comment_failures: report.comments_failed(),
                })
                .collect(),
        }
    }

    /// Appends this record as one JSON line to `{root}/sessions.jsonl`.
    pub async fn append_to(&self, root: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(root).await?;

        let mut line = serde_json::to_string(self)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(root.join(SESSIONS_FILE))
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
