//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::collections::BTreeSet;
use std::time::Duration;
use sumi_scope::config::Config;
use sumi_scope::crawler::{build_http_client, Crawler, PageFetcher};
use sumi_scope::Engine;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crawler() -> Crawler {
    let client = build_http_client().expect("Failed to build client");
    Crawler::new(
        PageFetcher::new(client),
        "SitemapGeneratorBot/1.0",
        Duration::from_secs(5),
    )
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn urls(base: &str, paths: &[&str]) -> BTreeSet<String> {
    paths.iter().map(|p| format!("{}{}", base, p)).collect()
}

#[tokio::test]
async fn test_crawl_follows_same_site_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/about">About</a> <a href="/blog">Blog</a>"#,
    )
    .await;
    mount_page(&server, "/about", r#"<a href="/">Home</a>"#).await;
    mount_page(&server, "/blog", r#"<a href="/blog/post-1">Post</a>"#).await;
    mount_page(&server, "/blog/post-1", "No links here").await;

    let visited = crawler().crawl(&format!("{}/", base), 50).await;

    assert_eq!(visited, urls(&base, &["/", "/about", "/blog", "/blog/post-1"]));
}

#[tokio::test]
async fn test_max_pages_one_returns_only_start() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a> <a href="/b">B</a> <a href="/c">C</a>"#,
    )
    .await;

    let start = format!("{}/", base);
    let visited = crawler().crawl(&start, 1).await;

    assert_eq!(visited, BTreeSet::from([start]));
}

#[tokio::test]
async fn test_page_cap_is_respected() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/page-{}">{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &links).await;
    Mock::given(method("GET"))
        .respond_with(html(&links))
        .mount(&server)
        .await;

    let visited = crawler().crawl(&format!("{}/", base), 5).await;

    assert_eq!(visited.len(), 5);
    assert!(visited.contains(&format!("{}/", base)));
}

#[tokio::test]
async fn test_fragments_are_deduplicated() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r##"<a href="/docs#intro">Intro</a> <a href="/docs#usage">Usage</a> <a href="#top">Top</a>"##,
    )
    .await;
    mount_page(&server, "/docs", "Docs").await;

    let visited = crawler().crawl(&format!("{}/#start", base), 50).await;

    assert_eq!(visited, urls(&base, &["/", "/docs"]));
}

#[tokio::test]
async fn test_off_site_links_are_skipped() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="{}/elsewhere">Other port</a> <a href="https://example.org/">Other host</a> <a href="/local">Local</a>"#,
            other.uri()
        ),
    )
    .await;
    mount_page(&server, "/local", "Local").await;
    Mock::given(method("GET"))
        .respond_with(html("Should never be fetched"))
        .expect(0)
        .mount(&other)
        .await;

    let visited = crawler().crawl(&format!("{}/", base), 50).await;

    assert_eq!(visited, urls(&base, &["/", "/local"]));
}

#[tokio::test]
async fn test_failed_pages_count_but_are_not_expanded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/missing">Missing</a> <a href="/data.json">Data</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"<a href="/hidden">Hidden</a>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"href": "/hidden"}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let visited = crawler().crawl(&format!("{}/", base), 50).await;

    assert_eq!(visited, urls(&base, &["/", "/data.json", "/missing"]));
}

#[tokio::test]
async fn test_crawler_identifies_itself() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "SitemapGeneratorBot/1.0"))
        .respond_with(html(r#"<a href="/next">Next</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .and(header("user-agent", "SitemapGeneratorBot/1.0"))
        .respond_with(html("End"))
        .expect(1)
        .mount(&server)
        .await;

    let visited = crawler().crawl(&format!("{}/", base), 50).await;
    assert_eq!(visited.len(), 2);
}

#[tokio::test]
async fn test_malformed_start_url_returns_seed() {
    let visited = crawler().crawl("http://", 50).await;
    assert_eq!(visited, BTreeSet::from(["http://".to_string()]));
}

#[tokio::test]
async fn test_unreachable_start_url_is_still_visited() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let start = format!("http://127.0.0.1:{}/", port);
    let visited = crawler().crawl(&start, 50).await;

    assert_eq!(visited, BTreeSet::from([start]));
}

#[tokio::test]
async fn test_engine_crawl_applies_scheme() {
    let server = MockServer::start().await;
    let host = server.address().to_string();

    mount_page(&server, "/", r#"<a href="/about">About</a>"#).await;
    mount_page(&server, "/about", "About").await;

    let mut config = Config::default();
    config.inspectors.certificate = false;
    config.inspectors.dns = false;
    config.inspectors.archive = false;
    let engine = Engine::new(config).expect("Failed to build engine");

    let result = engine.crawl(&host, 50).await;

    assert_eq!(
        result.urls,
        vec![
            format!("http://{}/", host),
            format!("http://{}/about", host),
        ]
    );
}

#[tokio::test]
async fn test_engine_crawl_applies_scheme_despite_embedded_url() {
    let server = MockServer::start().await;
    let host = server.address().to_string();

    mount_page(&server, "/", "Landing").await;

    let mut config = Config::default();
    config.inspectors.certificate = false;
    config.inspectors.dns = false;
    config.inspectors.archive = false;
    let engine = Engine::new(config).expect("Failed to build engine");

    let seed = format!("{}/?next=https://example.org/", host);
    let result = engine.crawl(&seed, 50).await;

    assert_eq!(result.urls, vec![format!("http://{}", seed)]);
}
