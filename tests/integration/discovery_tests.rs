//! Integration tests for sitemap discovery
//!
//! Each test stands up a mock site with wiremock and runs the orchestrator
//! against it, checking both the returned URLs and the persisted sitemap.

use flate2::write::GzEncoder;
use flate2::Compression;
use sitemap_scout::config::Config;
use sitemap_scout::discovery::{FallbackChoice, FixedDecision, Orchestrator, Provenance};
use sitemap_scout::sitemap::{parse, parse_entries};
use sitemap_scout::ScoutError;
use std::io::Write;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_orchestrator(dir: &TempDir, augment: bool) -> Orchestrator {
    let mut config = Config::default();
    config.crawler.delay_ms = 0;
    config.discovery.augment = augment;
    config.discovery.output = dir.path().join("sitemap.xml");
    Orchestrator::new(config)
        .expect("Failed to build orchestrator")
        .with_staging_dir(dir.path().join("staging"))
}

fn urlset(locs: &[String]) -> String {
    let urls: String = locs
        .iter()
        .map(|loc| format!("  <url><loc>{}</loc></url>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>\n",
        urls
    )
}

fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

async fn mount_robots_sitemap(server: &MockServer, sitemap_path: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("User-agent: *\nSitemap: {}\n", sitemap_path)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_found_sitemap_at_common_path() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    urlset(&[format!("{}/", base), format!("{}/docs/", base)]),
                    "application/xml",
                ),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = test_orchestrator(&dir, false)
        .discover(
            &Url::parse(&base).unwrap(),
            &FixedDecision(FallbackChoice::Cancel),
        )
        .await
        .expect("Discovery failed");

    assert_eq!(result.provenance, Provenance::Found);
    let urls: Vec<String> = result.urls().into_iter().map(|u| u.into_string()).collect();
    assert_eq!(urls, vec![format!("{}/", base), format!("{}/docs", base)]);
    assert_eq!(parse(&result.sitemap_path).unwrap().len(), 2);
}

#[tokio::test]
async fn test_sitemap_index_with_gzip_child() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots_sitemap(&server, "/sitemap_index.xml").await;
    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{}/sitemaps/pages.xml.gz</loc></sitemap>
</sitemapindex>"#,
            base
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemaps/pages.xml.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gzip(&urlset(&[
            format!("{}/guide", base),
            format!("{}/reference", base),
        ]))))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = test_orchestrator(&dir, false)
        .discover(
            &Url::parse(&base).unwrap(),
            &FixedDecision(FallbackChoice::Cancel),
        )
        .await
        .expect("Discovery failed");

    assert_eq!(result.provenance, Provenance::Found);
    assert_eq!(result.len(), 2);
    assert!(result
        .sitemap_url
        .as_ref()
        .unwrap()
        .as_str()
        .ends_with("/sitemap_index.xml"));

    let persisted = parse(&result.sitemap_path).unwrap();
    assert_eq!(persisted, result.urls());
}

#[tokio::test]
async fn test_augmented_merge_keeps_sitemap_order() {
    let server = MockServer::start().await;
    let base = server.uri();
    let a = format!("{}/", base);
    let b = format!("{}/b", base);

    mount_robots_sitemap(&server, "/sitemap.xml").await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[a.clone()])))
        .mount(&server)
        .await;
    mount_html(&server, "/", r#"<a href="/b">B</a><a href="/">Home</a>"#).await;
    mount_html(&server, "/b", r#"<a href="/">Home</a>"#).await;

    let dir = tempfile::tempdir().unwrap();
    let result = test_orchestrator(&dir, true)
        .discover(
            &Url::parse(&base).unwrap(),
            &FixedDecision(FallbackChoice::Cancel),
        )
        .await
        .expect("Discovery failed");

    assert_eq!(result.provenance, Provenance::Augmented);
    let urls: Vec<String> = result.urls().into_iter().map(|u| u.into_string()).collect();
    assert_eq!(urls, vec![a.clone(), b.clone()]);

    let persisted: Vec<String> = parse(&result.sitemap_path)
        .unwrap()
        .into_iter()
        .map(|u| u.into_string())
        .collect();
    assert_eq!(persisted, vec![a, b]);
}

#[tokio::test]
async fn test_generated_when_no_sitemap() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", r#"<a href="/about">About</a>"#).await;
    mount_html(&server, "/about", "<p>about</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let result = test_orchestrator(&dir, false)
        .discover(
            &Url::parse(&base).unwrap(),
            &FixedDecision(FallbackChoice::Crawl),
        )
        .await
        .expect("Discovery failed");

    assert_eq!(result.provenance, Provenance::Generated);
    assert_eq!(result.sitemap_url, None);
    assert_eq!(result.len(), 2);

    let document = std::fs::read_to_string(&result.sitemap_path).unwrap();
    let entries = parse_entries(&document);
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|e| e.changefreq.as_deref() == Some("weekly")));
}

#[tokio::test]
async fn test_malformed_sitemap_falls_back_to_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots_sitemap(&server, "/sitemap.xml").await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset><url><loc>oops</url>"))
        .mount(&server)
        .await;
    mount_html(&server, "/", "<p>home</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let result = test_orchestrator(&dir, false)
        .discover(
            &Url::parse(&base).unwrap(),
            &FixedDecision(FallbackChoice::Crawl),
        )
        .await
        .expect("Discovery failed");

    assert_eq!(result.provenance, Provenance::Generated);
    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_cancel_when_no_sitemap() {
    let server = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let result = test_orchestrator(&dir, false)
        .discover(
            &Url::parse(&server.uri()).unwrap(),
            &FixedDecision(FallbackChoice::Cancel),
        )
        .await;

    assert!(matches!(result, Err(ScoutError::Cancelled)));
    assert!(!dir.path().join("sitemap.xml").exists());
}

#[tokio::test]
async fn test_zero_page_crawl_is_an_error() {
    let server = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let result = test_orchestrator(&dir, false)
        .discover(
            &Url::parse(&server.uri()).unwrap(),
            &FixedDecision(FallbackChoice::Crawl),
        )
        .await;

    assert!(matches!(result, Err(ScoutError::NoPagesDiscovered { .. })));
}

#[tokio::test]
async fn test_download_failure_is_an_error() {
    let server = MockServer::start().await;

    mount_robots_sitemap(&server, "/sitemap.xml").await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = test_orchestrator(&dir, false)
        .discover(
            &Url::parse(&server.uri()).unwrap(),
            &FixedDecision(FallbackChoice::Crawl),
        )
        .await;

    assert!(matches!(
        result,
        Err(ScoutError::DownloadFailed { status: 500, .. })
    ));
}
