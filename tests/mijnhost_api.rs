//! Full pass against mocked lookup and mijn.host endpoints.

use mijnhost_ddns::config::Settings;
use mijnhost_ddns::daemon::Updater;
use mijnhost_ddns::dns::MijnHostProvider;
use mijnhost_ddns::ip::HttpResolver;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_dns_api(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1.2.3.4\n"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v6"))
        .respond_with(ResponseTemplate::new(502))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/domains/example.com/dns"))
        .and(header("API-Key", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "data": {
                "domain": "example.com",
                "records": [
                    {"type": "A", "name": "example.com.", "value": "9.9.9.9", "ttl": 900},
                    {"type": "AAAA", "name": "example.com.", "value": "2001:db8::1", "ttl": 900},
                    {"type": "TXT", "name": "example.com.", "value": "v=spf1 -all", "ttl": 3600}
                ]
            }
        })))
        .mount(server)
        .await;
}

fn settings(server: &MockServer, create: bool) -> Settings {
    Settings::from_json(
        &json!({
            "domain_name": "example.com",
            "api_key": "test_key",
            "record_names": ["@", "*"],
            "default_ttl": 3600,
            "create_records_if_missing": create,
            "api_base_url": format!("{}/api/v2", server.uri()),
            "ipv4_lookup_urls": [format!("{}/v4", server.uri())],
            "ipv6_lookup_urls": [format!("{}/v6", server.uri())],
            "request_timeout_secs": 5
        })
        .to_string(),
    )
    .unwrap()
}

fn updater(settings: Settings, dry_run: bool) -> Updater {
    let resolver = HttpResolver::from_settings(&settings).unwrap();
    let provider = MijnHostProvider::from_settings(&settings).unwrap();
    Updater::new(settings, Box::new(resolver), Box::new(provider), dry_run)
}

#[tokio::test]
async fn pass_updates_and_creates_over_http() {
    let server = MockServer::start().await;
    mock_dns_api(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/api/v2/domains/example.com/dns"))
        .and(header("API-Key", "test_key"))
        .and(body_json(json!({
            "record": {"type": "A", "name": "example.com.", "value": "1.2.3.4", "ttl": 900}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/domains/example.com/dns"))
        .and(body_json(json!({
            "record": {"type": "A", "name": "*", "value": "1.2.3.4", "ttl": 3600}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let report = updater(settings(&server, true), false)
        .run_pass()
        .await
        .unwrap();

    assert_eq!(report.apply.applied, 2);
    assert_eq!(report.apply.failed, 0);
}

#[tokio::test]
async fn dry_run_sends_no_writes_over_http() {
    let server = MockServer::start().await;
    mock_dns_api(&server).await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = updater(settings(&server, true), true)
        .run_pass()
        .await
        .unwrap();

    assert_eq!(report.apply.planned, 2);
    assert_eq!(report.apply.applied, 0);
}

#[tokio::test]
async fn rejected_api_key_fails_the_pass() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1.2.3.4"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/domains/example.com/dns"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = updater(settings(&server, true), false)
        .run_pass()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("failed to fetch DNS records for example.com"));
}
