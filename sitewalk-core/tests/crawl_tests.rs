// Tests for crawl functionality

use sitewalk_core::crawl::{CrawlOptions, execute_crawl, extract_url_path};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
}

#[test]
fn test_extract_url_path_empty_path() {
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(extract_url_path("http://example.com/docs/v1/intro.html"), "/docs/v1/intro.html");
}

#[test]
fn test_extract_url_path_with_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/page?key=value#top"), "/page");
}

#[test]
fn test_extract_url_path_with_port() {
    assert_eq!(extract_url_path("http://example.com:8080/page"), "/page");
}

#[test]
fn test_extract_url_path_with_trailing_slash() {
    assert_eq!(extract_url_path("http://example.com/docs/"), "/docs/");
}

#[test]
fn test_extract_url_path_invalid_url() {
    let url = "not a valid url";
    // Should return original string for invalid URLs
    assert_eq!(extract_url_path(url), url);
}

// ============================================================================
// Options Tests
// ============================================================================

#[test]
fn test_crawl_options_defaults() {
    let options = CrawlOptions::new(vec!["https://base.com/".to_string()]);
    assert_eq!(options.max_attempts, 3);
    assert_eq!(options.timeout_secs, 10);
    assert!(options.max_pages.is_none());
    assert!(!options.show_progress_bars);
}

// ============================================================================
// Execution Tests
// ============================================================================

fn quick_options(urls: Vec<String>) -> CrawlOptions {
    let mut options = CrawlOptions::new(urls);
    options.timeout_secs = 5;
    options.retry_delay = Duration::ZERO;
    options
}

#[tokio::test]
async fn test_execute_crawl_single_site() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="about">About</a><a href="logo.svg">Logo</a>"#, "text/html"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/">Home</a>"#, "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let results = execute_crawl(quick_options(vec![mock_server.uri()]), None)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].visited_count(), 2);
    assert_eq!(results[0].seen_count(), 3);
}

#[tokio::test]
async fn test_execute_crawl_reports_bad_seeds_and_continues() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>empty</p>", "text/html"))
        .mount(&mock_server)
        .await;

    let messages = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();
    let callback = Arc::new(move |msg: String| messages_clone.lock().unwrap().push(msg));

    let results = execute_crawl(
        quick_options(vec!["not a url".to_string(), mock_server.uri()]),
        Some(callback),
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.contains("Crawling host 2/2")));
    assert!(messages.iter().any(|m| m.contains("Failed to crawl not a url")));
}

#[tokio::test]
async fn test_execute_crawl_respects_max_pages() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="a">a</a><a href="b">b</a><a href="c">c</a>"#, "text/html"),
        )
        .mount(&mock_server)
        .await;

    let mut options = quick_options(vec![mock_server.uri()]);
    options.max_pages = Some(2);
    let results = execute_crawl(options, None).await.unwrap();

    assert_eq!(results[0].visited_count(), 2);
    assert_eq!(results[0].seen_count(), 3);
}
