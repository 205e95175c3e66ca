//! Integration tests for the check orchestrator
//!
//! `example.com` is pinned to a local wiremock server through the client's
//! DNS overrides, so the full check runs without leaving the machine. TLS,
//! DNS and archive inspectors are disabled; registration goes to a mocked
//! RDAP registry.

use std::net::SocketAddr;
use sumi_scope::config::Config;
use sumi_scope::engine::SiteStatus;
use sumi_scope::seo::SeoGrade;
use sumi_scope::Engine;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates an offline config whose only registration source is `rdap_uri`
fn create_test_config(rdap_uri: &str) -> Config {
    let mut config = Config::default();
    config.inspectors.certificate = false;
    config.inspectors.dns = false;
    config.inspectors.archive = false;
    config.registration.whois = false;
    config.registration.rdap_endpoint = rdap_uri.to_string();
    config
}

/// Builds an engine resolving `example.com` to `addr`
fn pinned_engine(config: Config, addr: SocketAddr) -> Engine {
    let client = reqwest::Client::builder()
        .resolve("example.com", addr)
        .build()
        .expect("Failed to build client");
    Engine::with_client(config, client).expect("Failed to build engine")
}

async fn mount_registry(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objectClassName": "domain",
            "ldhName": "EXAMPLE.COM",
            "events": [
                {"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"},
                {"eventAction": "expiration", "eventDate": "2030-08-13T04:00:00Z"}
            ]
        })))
        .mount(server)
        .await;
}

fn seo_page() -> String {
    format!(
        r#"<html><head>
            <title>{}</title>
            <meta name="description" content="{}">
            <link rel="canonical" href="https://example.com/">
            <meta property="og:title" content="Example">
            <meta property="og:description" content="Example site">
            <meta name="twitter:card" content="summary">
        </head><body><h1>Welcome</h1></body></html>"#,
        "t".repeat(45),
        "d".repeat(140)
    )
}

#[tokio::test]
async fn test_check_working_site() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "WebsiteChecker/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(seo_page())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;
    mount_registry(&server).await;

    let engine = pinned_engine(create_test_config(&server.uri()), *server.address());
    let input = format!("example.com:{}", server.address().port());
    let result = engine.check(&input).await;

    assert_eq!(result.url, input);
    assert_eq!(result.status, SiteStatus::Working(200));

    let seo = result.seo.as_ref().expect("SEO report missing");
    assert_eq!(seo.score, 90);
    assert_eq!(seo.grade, SeoGrade::APlus);
    assert_eq!(seo.h1_tags, vec!["Welcome".to_string()]);

    let registration = result
        .domain_info
        .registration
        .as_ref()
        .expect("Registration missing");
    assert_eq!(registration.domain, "example.com");
    assert_eq!(registration.registered_on, "1995-08-14 04:00:00");
    assert_eq!(registration.expires_on, "2030-08-13 04:00:00");
    assert!(result.domain_info.certificate.is_none());
    assert!(result.domain_info.dns.is_none());
    assert!(result.domain_info.archive.is_none());
}

#[tokio::test]
async fn test_check_json_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(seo_page())
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;
    mount_registry(&server).await;

    let engine = pinned_engine(create_test_config(&server.uri()), *server.address());
    let result = engine
        .check(&format!("http://example.com:{}/", server.address().port()))
        .await;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["status"], "Working (200)");
    assert_eq!(json["seo"]["grade"], "A+");
    assert_eq!(json["seo"]["score"], 90);
    assert_eq!(json["domain_info"]["registrar"], "Unknown");
    assert_eq!(json["domain_info"]["registered_on"], "1995-08-14 04:00:00");
    let duration = json["duration"].as_str().unwrap();
    assert!(duration.ends_with('s'));
    assert_eq!(duration.split('.').nth(1).map(|d| d.len()), Some(3));
}

#[tokio::test]
async fn test_non_html_page_has_no_seo() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let engine = pinned_engine(create_test_config(&server.uri()), *server.address());
    let result = engine
        .check(&format!("http://example.com:{}/feed.json", server.address().port()))
        .await;

    assert_eq!(result.status, SiteStatus::Working(200));
    assert!(result.seo.is_none());
}

#[tokio::test]
async fn test_error_status_is_still_working() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("<html><title>Not found</title></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let engine = pinned_engine(create_test_config(&server.uri()), *server.address());
    let result = engine
        .check(&format!("http://example.com:{}/gone", server.address().port()))
        .await;

    assert_eq!(result.status.to_string(), "Working (404)");
    assert!(result.seo.is_none());
}

#[tokio::test]
async fn test_registry_failure_degrades_to_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let engine = pinned_engine(create_test_config(&server.uri()), *server.address());
    let result = engine
        .check(&format!("example.com:{}", server.address().port()))
        .await;

    assert_eq!(result.status, SiteStatus::Working(200));
    let registration = result.domain_info.registration.unwrap();
    assert_eq!(registration.domain, "example.com");
    assert_eq!(registration.registrar, "Unknown");
    assert_eq!(registration.registered_on, "Unknown");
}

#[tokio::test]
async fn test_slow_site_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(3))
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.engine.check_timeout_secs = 1;
    let engine = pinned_engine(config, *server.address());
    let result = engine
        .check(&format!("example.com:{}", server.address().port()))
        .await;

    assert_eq!(result.status.to_string(), "Not Working (Timeout)");
    assert!(result.seo.is_none());
}

#[tokio::test]
async fn test_unreachable_site_is_stable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed = listener.local_addr().unwrap();
    drop(listener);

    let mut config = create_test_config("http://127.0.0.1:9");
    config.registration.rdap = false;
    let engine = pinned_engine(config, closed);
    let input = format!("example.com:{}", closed.port());

    let first = engine.check(&input).await;
    let second = engine.check(&input).await;

    assert_eq!(first.status, SiteStatus::NotWorking);
    assert_eq!(first.status, second.status);
    assert!(first.seo.is_none());
    assert!(first.domain_info.registration.is_some());
}

#[tokio::test]
async fn test_invalid_inputs() {
    let engine = Engine::new(create_test_config("http://127.0.0.1:9")).unwrap();

    let result = engine.check("not a domain").await;
    assert_eq!(result.status.to_string(), "Invalid Domain");
    assert!(result.domain_info.is_empty());
    assert!(result.duration.ends_with('s'));

    let result = engine.check("http://").await;
    assert_eq!(result.status.to_string(), "Invalid URL");

    let result = engine.check("ftp://example.com/").await;
    assert_eq!(result.status.to_string(), "Invalid URL");
}
