//! Integration tests for the registration provider chain
//!
//! WHOIS is served by a local TCP listener; RDAP and the commercial API
//! are wiremock servers whose call counts are verified on drop.

use std::sync::Arc;
use std::time::Duration;
use sumi_scope::registration::{
    RdapProvider, RegistrationProvider, RegistrationRecord, RegistrationResolver,
    WhoisApiProvider, WhoisProvider,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

/// A port nothing listens on
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Serves a referral and then a registry answer on one port
async fn whois_server(registry_answer: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        for answer in ["refer: localhost\n", registry_answer] {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut query = [0u8; 256];
            let _ = socket.read(&mut query).await;
            socket.write_all(answer.as_bytes()).await.unwrap();
        }
    });
    port
}

fn whois(port: u16, timeout: Duration) -> Arc<dyn RegistrationProvider> {
    Arc::new(WhoisProvider::new("127.0.0.1", timeout).with_port(port))
}

fn rdap(server: &MockServer) -> Arc<dyn RegistrationProvider> {
    Arc::new(RdapProvider::new(
        reqwest::Client::new(),
        server.uri(),
        "TestAgent/1.0",
        TIMEOUT,
    ))
}

fn api(server: &MockServer) -> Arc<dyn RegistrationProvider> {
    Arc::new(WhoisApiProvider::new(
        reqwest::Client::new(),
        format!("{}/whoisserver/WhoisService", server.uri()),
        "test-key",
        "TestAgent/1.0",
        TIMEOUT,
    ))
}

#[tokio::test]
async fn test_whois_failure_falls_back_to_rdap() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "events": [{"eventAction": "registration", "eventDate": "2020-01-01T00:00:00Z"}]
        })))
        .expect(1)
        .mount(&registry)
        .await;

    let commercial = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&commercial)
        .await;

    let resolver = RegistrationResolver::new(vec![
        whois(closed_port(), TIMEOUT),
        rdap(&registry),
        api(&commercial),
    ]);

    let record = resolver.resolve("example.com").await;

    assert_eq!(record.domain, "example.com");
    assert_eq!(record.registered_on, "2020-01-01 00:00:00");
    assert_eq!(record.registrar, "Unknown");
}

#[tokio::test]
async fn test_whois_answer_stops_the_chain() {
    let port = whois_server(
        "Registrar: Example Registrar, Inc.\nCreation Date: 1997-09-15T04:00:00Z\n",
    )
    .await;

    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&registry)
        .await;

    let resolver = RegistrationResolver::new(vec![whois(port, TIMEOUT), rdap(&registry)]);

    let record = resolver.resolve("example.com").await;

    assert_eq!(record.registrar, "Example Registrar, Inc.");
    assert_eq!(record.registered_on, "1997-09-15 04:00:00");
}

#[tokio::test]
async fn test_unusable_answers_reach_the_api() {
    let port = whois_server("No match for domain \"EXAMPLE.COM\".\n").await;

    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&registry)
        .await;

    let commercial = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whoisserver/WhoisService"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "WhoisRecord": {
                "registrarName": "Example Registrar, Inc.",
                "createdDate": "1995-08-14T04:00:00Z",
                "expiresDate": "2030-08-13T04:00:00Z",
                "updatedDate": "2024-08-14T07:01:34Z"
            }
        })))
        .expect(1)
        .mount(&commercial)
        .await;

    let resolver = RegistrationResolver::new(vec![
        whois(port, TIMEOUT),
        rdap(&registry),
        api(&commercial),
    ]);

    let record = resolver.resolve("example.com").await;

    assert_eq!(
        record,
        RegistrationRecord {
            domain: "example.com".to_string(),
            registrar: "Example Registrar, Inc.".to_string(),
            registered_on: "1995-08-14 04:00:00".to_string(),
            expires_on: "2030-08-13 04:00:00".to_string(),
            updated_on: "2024-08-14 07:01:34".to_string(),
        }
    );
}

#[tokio::test]
async fn test_every_provider_failing_yields_unknown() {
    let registry = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&registry)
        .await;

    let commercial = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ErrorMessage": {"errorCode": "AUTHENTICATE_03", "msg": "Invalid API key"}
        })))
        .expect(1)
        .mount(&commercial)
        .await;

    let resolver = RegistrationResolver::new(vec![
        whois(closed_port(), TIMEOUT),
        rdap(&registry),
        api(&commercial),
    ]);

    assert_eq!(
        resolver.resolve("example.com").await,
        RegistrationRecord::unknown("example.com")
    );
}

#[tokio::test]
async fn test_slow_whois_times_out() {
    // Accepts but never answers
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let provider = whois(port, Duration::from_millis(300));
    let started = std::time::Instant::now();
    let result = provider.try_resolve("example.com").await;

    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
}
