//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use sitemap_scout::config::{CrawlerConfig, HttpConfig};
use sitemap_scout::crawler::{Crawler, Fetcher};
use sitemap_scout::sitemap::parse_str;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler config without politeness delay
fn crawler_config(max_depth: u32, max_pages: usize) -> CrawlerConfig {
    CrawlerConfig {
        max_depth,
        max_pages,
        delay_ms: 0,
    }
}

async fn crawl(server: &MockServer, config: CrawlerConfig) -> Vec<String> {
    let fetcher = Fetcher::new(&HttpConfig::default()).expect("Failed to build fetcher");
    let base = Url::parse(&server.uri()).expect("Failed to parse base URL");
    Crawler::for_site(fetcher, base, config)
        .await
        .crawl()
        .await
        .into_iter()
        .map(|url| url.into_string())
        .collect()
}

/// Mounts an HTML page answering GET at `route`
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        format!(
            r#"<html><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2/">Page 2</a>
            <a href="https://external.example.org/">External</a>
            </body></html>"#,
            base
        ),
    )
    .await;
    mount_page(&server, "/page1", r#"<a href="/">Home</a><a href="/page2">Two</a>"#.into()).await;
    mount_page(&server, "/page2", r#"<a href="/page1#top">One</a>"#.into()).await;

    let urls = crawl(&server, crawler_config(3, 100)).await;

    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/page1", base),
            format!("{}/page2", base),
        ]
    );
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        r#"<a href="/private/secret">Secret</a><a href="/public">Public</a>"#.into(),
    )
    .await;
    mount_page(&server, "/public", "<p>public</p>".into()).await;

    // The disallowed page must never be requested
    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let urls = crawl(&server, crawler_config(3, 100)).await;

    assert_eq!(urls.len(), 2);
    assert!(urls.iter().all(|u| !u.contains("/private")));
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/level1">L1</a>"#.into()).await;
    mount_page(&server, "/level1", r#"<a href="/level2">L2</a>"#.into()).await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let urls = crawl(&server, crawler_config(1, 100)).await;

    assert_eq!(urls.len(), 2);
    assert!(urls[1].ends_with("/level1"));
}

#[tokio::test]
async fn test_crawl_stops_at_page_budget() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#.into(),
    )
    .await;
    mount_page(&server, "/a", "<p>a</p>".into()).await;
    mount_page(&server, "/b", "<p>b</p>".into()).await;
    mount_page(&server, "/c", "<p>c</p>".into()).await;

    let urls = crawl(&server, crawler_config(3, 2)).await;

    assert_eq!(urls.len(), 2);
    assert!(urls[1].ends_with("/a"));
}

#[tokio::test]
async fn test_each_page_fetched_once() {
    let server = MockServer::start().await;

    for (route, body) in [
        ("/", r#"<a href="/a">A</a><a href="/b/">B</a>"#),
        ("/a", r#"<a href="/b">B</a><a href="/">Home</a><a href="/a?x=1">Self</a>"#),
        ("/b", r#"<a href="/a/">A</a><a href="/b#again">B</a>"#),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
            .expect(1)
            .mount(&server)
            .await;
    }

    let urls = crawl(&server, crawler_config(5, 100)).await;
    assert_eq!(urls.len(), 3);
}

#[tokio::test]
async fn test_content_type_handling() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/data">Data</a><a href="/missing">Missing</a><a href="/page">Page</a>"#.into(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;
    mount_page(&server, "/page", "<p>page</p>".into()).await;

    let urls = crawl(&server, crawler_config(3, 100)).await;

    assert_eq!(urls.len(), 2);
    assert!(urls[1].ends_with("/page"));
}

#[tokio::test]
async fn test_relative_links_follow_redirect_target() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/old">Old</a>"#.into()).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/guide/"))
        .mount(&server)
        .await;
    mount_page(&server, "/guide/", r#"<a href="intro">Intro</a>"#.into()).await;
    mount_page(&server, "/guide/intro", "<p>intro</p>".into()).await;

    let urls = crawl(&server, crawler_config(3, 100)).await;

    assert!(urls.contains(&format!("{}/guide/intro", server.uri())));
}

#[tokio::test]
async fn test_generated_sitemap_round_trip() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/docs">Docs</a>"#.into()).await;
    mount_page(&server, "/docs", "<p>docs</p>".into()).await;

    let fetcher = Fetcher::new(&HttpConfig::default()).unwrap();
    let base = Url::parse(&server.uri()).unwrap();
    let crawled = Crawler::for_site(fetcher, base, crawler_config(2, 10))
        .await
        .crawl()
        .await;

    let xml = Crawler::generate_sitemap(&crawled);
    assert_eq!(parse_str(&xml), crawled);
    assert!(xml.contains("<priority>0.5</priority>"));
}
