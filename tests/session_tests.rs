//! Integration tests for the session scheduler
//!
//! These tests use wiremock to stand in for the listing site and the
//! externally-linked hosts, and drive single sessions through the same
//! `run_session` seam the crawl loop uses.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ycrawler::config::Config;
use ycrawler::crawler::{run_session, VisitedSet};
use ycrawler::persist;

fn test_config(base: &str, root: &Path, top_n: usize) -> Arc<Config> {
    Arc::new(Config {
        base_url: Url::parse(base).unwrap(),
        restart_interval: Duration::from_millis(10),
        top_n,
        concurrency: 16,
        timeout: Duration::from_secs(5),
        per_host_limit: 8,
        output_root: root.to_path_buf(),
    })
}

fn listing_html(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(id, href)| {
            format!(
                r#"<tr class="athing" id="{id}"><td><a class="storylink" href="{href}">Story {id}</a></td></tr>"#
            )
        })
        .collect();
    format!("<html><body><table>{body}</table></body></html>")
}

fn discussion_html(hrefs: &[&str]) -> String {
    let body: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{href}" rel="nofollow">link</a>"#))
        .collect();
    format!("<html><body>{body}</body></html>")
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_listing(server: &MockServer, rows: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(listing_html(rows)))
        .mount(server)
        .await;
}

async fn mount_discussion(server: &MockServer, id: &str, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/item"))
        .and(query_param("id", id))
        .respond_with(html_response(discussion_html(hrefs)))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_response(format!("<html>{route}</html>")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_top_n_boundary_and_comment_fan_out() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), 2);

    mount_listing(
        &server,
        &[("101", "/story101"), ("102", "/story102"), ("103", "/story103")],
    )
    .await;
    mount_page(&server, "/story101").await;
    mount_page(&server, "/story102").await;
    // Discussion for 101 carries two distinct links plus one exact duplicate
    mount_discussion(&server, "101", &["/ext/a", "/ext/b", "/ext/a"]).await;
    mount_discussion(&server, "102", &[]).await;
    mount_page(&server, "/ext/a").await;
    mount_page(&server, "/ext/b").await;

    // Row 3 is beyond top-N and must never be fetched
    Mock::given(method("GET"))
        .and(path("/story103"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let visited = VisitedSet::new();
    let summary = run_session(config.clone(), &visited).await.unwrap();

    assert_eq!(summary.selected, 2);
    assert_eq!(summary.reports.len(), 2);
    assert!(summary.failed.is_empty());

    let report_101 = summary.reports.iter().find(|r| r.id == "101").unwrap();
    assert_eq!(report_101.comments.len(), 2);
    assert_eq!(report_101.comments_saved(), 2);

    // Story page and both distinct comment pages are on disk under the id
    let story_dir = dir.path().join("101");
    let story_url = Url::parse(&format!("{}/story101", server.uri())).unwrap();
    let expected = story_dir.join(persist::file_name(
        &story_url,
        "text/html; charset=utf-8",
        "story",
    ));
    assert!(expected.is_file());
    let comment_files = std::fs::read_dir(&story_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("comment_"))
        .count();
    assert_eq!(comment_files, 2);

    assert!(!dir.path().join("103").exists());
}

#[tokio::test]
async fn test_cross_session_dedup() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), 10);

    mount_listing(&server, &[("201", "/story201")]).await;
    mount_discussion(&server, "201", &[]).await;

    // The story page may be fetched exactly once across both sessions
    Mock::given(method("GET"))
        .and(path("/story201"))
        .respond_with(html_response("<html>story</html>".to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let mut visited = VisitedSet::new();

    let first = run_session(config.clone(), &visited).await.unwrap();
    assert_eq!(first.reports.len(), 1);
    visited.extend(first.fresh_ids());

    let second = run_session(config.clone(), &visited).await.unwrap();
    assert_eq!(second.selected, 0);
    assert!(second.reports.is_empty());
}

#[tokio::test]
async fn test_comment_failure_is_isolated() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), 10);

    mount_listing(&server, &[("301", "/story301")]).await;
    mount_page(&server, "/story301").await;
    mount_discussion(&server, "301", &["/ext/ok", "/ext/broken"]).await;
    mount_page(&server, "/ext/ok").await;
    Mock::given(method("GET"))
        .and(path("/ext/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let visited = VisitedSet::new();
    let summary = run_session(config, &visited).await.unwrap();

    // The story still counts as successful and would enter the visited set
    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.fresh_ids(), vec!["301".to_string()]);

    let report = &summary.reports[0];
    assert_eq!(report.comments_saved(), 1);
    assert_eq!(report.comments_failed(), 1);
    assert!(report.story_file.is_file());
}

#[tokio::test]
async fn test_failed_story_is_retried_next_session() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), 10);

    mount_listing(&server, &[("401", "/story401")]).await;
    Mock::given(method("GET"))
        .and(path("/story401"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut visited = VisitedSet::new();

    let first = run_session(config.clone(), &visited).await.unwrap();
    assert!(first.reports.is_empty());
    assert_eq!(first.failed.len(), 1);
    assert_eq!(first.failed[0].0, "401");
    visited.extend(first.fresh_ids());

    // The id never entered the visited set, so the story is selected again
    let second = run_session(config, &visited).await.unwrap();
    assert_eq!(second.selected, 1);
}

#[tokio::test]
async fn test_listing_failure_skips_processing() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), 10);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/story501"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let visited = VisitedSet::new();
    let result = run_session(config, &visited).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_discussion_failure_withholds_story_id() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path(), 10);

    mount_listing(&server, &[("601", "/story601")]).await;
    mount_page(&server, "/story601").await;
    Mock::given(method("GET"))
        .and(path("/item"))
        .and(query_param("id", "601"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let visited = VisitedSet::new();
    let summary = run_session(config, &visited).await.unwrap();

    // The story page was saved, but without its comment fan-out the story
    // is not successful and stays eligible for the next session
    assert!(summary.reports.is_empty());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "601");
}
