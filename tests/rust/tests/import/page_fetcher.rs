//! Registry page fetcher tests against a wiremock registry

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mcpreg_core::service::{
    keys, AppSettingsService, RegistryClientConfig, RegistryPageFetcher, FETCH_ALL_PAGE_SIZE,
    MAX_PAGES_GUARD,
};
use mcpreg_core::{ImportError, McpProtocol};
use tests::fixtures::{official_record, package_record, registry_page, remote_record};
use tests::init_tracing;
use tests::mocks::MockSettingsRepository;

fn fetcher() -> RegistryPageFetcher {
    RegistryPageFetcher::new(RegistryClientConfig::default()).unwrap()
}

fn servers_url(server: &MockServer) -> String {
    format!("{}/v0/servers", server.uri())
}

// =============================================================================
// Single page
// =============================================================================

#[tokio::test]
async fn test_fetch_page_sends_query_and_accept_header() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/servers"))
        .and(query_param("cursor", "abc"))
        .and(query_param("limit", "5"))
        .and(query_param("search", "file system"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_page(
            vec![
                package_record("filesystem"),
                remote_record("weather", "sse", "https://weather.example.com/sse"),
            ],
            Some("next-1"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let page = fetcher()
        .fetch_page(&servers_url(&server), Some("abc"), Some(5), Some("file system"))
        .await
        .unwrap();

    assert_eq!(page.next_cursor.as_deref(), Some("next-1"));
    assert_eq!(page.servers.len(), 2);
    assert_eq!(page.servers[0].name, "filesystem");
    assert_eq!(page.servers[0].protocol, McpProtocol::Stdio);
    assert_eq!(page.servers[1].protocol, McpProtocol::Sse);
    assert_eq!(
        page.servers[1].first_front_endpoint().unwrap().endpoint_data,
        "weather.example.com:443"
    );
    assert!(page.servers.iter().all(|s| !s.id.is_empty()));
}

#[tokio::test]
async fn test_fetch_page_keeps_existing_query_string() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/servers"))
        .and(query_param("version", "latest"))
        .and(query_param("limit", "10"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(registry_page(vec![], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}?version=latest", servers_url(&server));
    let page = fetcher().fetch_page(&url, None, Some(10), None).await.unwrap();

    assert!(page.servers.is_empty());
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn test_fetch_page_accepts_camel_case_cursor_and_bare_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/servers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            package_record("alpha"),
            package_record("beta"),
        ])))
        .mount(&server)
        .await;

    let page = fetcher()
        .fetch_page(&servers_url(&server), None, None, None)
        .await
        .unwrap();

    let names: Vec<_> = page.servers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert_eq!(page.next_cursor, None);

    let camel = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [package_record("gamma")],
            "metadata": { "nextCursor": "c2" }
        })))
        .mount(&camel)
        .await;

    let page = fetcher()
        .fetch_page(&servers_url(&camel), None, None, None)
        .await
        .unwrap();
    assert_eq!(page.next_cursor.as_deref(), Some("c2"));
}

#[tokio::test]
async fn test_blank_cursor_in_response_ends_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(registry_page(vec![package_record("only")], Some("  "))),
        )
        .mount(&server)
        .await;

    let page = fetcher()
        .fetch_page(&servers_url(&server), None, None, None)
        .await
        .unwrap();
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn test_refetching_same_page_is_idempotent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("cursor", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_page(
            vec![official_record("srv-1", "one"), official_record("srv-2", "two")],
            Some("p3"),
        )))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fetcher();
    let url = servers_url(&server);
    let first = fetcher.fetch_page(&url, Some("p2"), None, None).await.unwrap();
    let second = fetcher.fetch_page(&url, Some("p2"), None, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.servers[0].id, "srv-1");
}

// =============================================================================
// Authorization
// =============================================================================

#[tokio::test]
async fn test_bearer_token_from_settings_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_page(vec![], None)))
        .expect(1)
        .mount(&server)
        .await;

    let settings = AppSettingsService::new(Arc::new(
        MockSettingsRepository::new().with(keys::registry::TOKEN, "  s3cret  "),
    ));
    let fetcher = RegistryPageFetcher::from_settings(&settings).await.unwrap();
    assert!(fetcher.has_bearer_token());

    fetcher
        .fetch_page(&servers_url(&server), None, None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_zero_timeouts_in_settings_fall_back_to_defaults() {
    let settings = AppSettingsService::new(Arc::new(
        MockSettingsRepository::new()
            .with(keys::registry::TIMEOUT_SECS, "0")
            .with(keys::registry::CONNECT_TIMEOUT_SECS, "3"),
    ));

    let config = RegistryClientConfig::from_settings(&settings).await;
    let defaults = RegistryClientConfig::default();

    assert_eq!(config.timeout, defaults.timeout);
    assert_eq!(config.connect_timeout, Duration::from_secs(3));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_page(vec![], None)))
        .mount(&server)
        .await;

    let fetcher = fetcher();
    assert!(!fetcher.has_bearer_token());
    fetcher
        .fetch_page(&servers_url(&server), None, None, None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_error_status_is_reported_with_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch_page(&servers_url(&server), None, None, None)
        .await
        .unwrap_err();

    match err {
        ImportError::HttpStatus { status, url } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/v0/servers"));
        }
        other => panic!("Expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch_page(&servers_url(&server), None, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::Parse { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_registry_is_a_transport_error() {
    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let url = format!("http://127.0.0.1:{}/v0/servers", port);

    let err = fetcher().fetch_page(&url, None, None, None).await.unwrap_err();
    assert!(matches!(err, ImportError::Transport { .. }), "got {:?}", err);
}

// =============================================================================
// Fetch all
// =============================================================================

#[tokio::test]
async fn test_fetch_all_follows_cursors_with_fixed_page_size() {
    init_tracing();
    let server = MockServer::start().await;
    let limit = FETCH_ALL_PAGE_SIZE.to_string();

    // Cursor-specific pages are mounted first so they win over the first-page mock
    Mock::given(method("GET"))
        .and(query_param("cursor", "p2"))
        .and(query_param("limit", limit.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_page(
            vec![package_record("c"), package_record("d")],
            Some("p3"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("cursor", "p3"))
        .and(query_param("limit", limit.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(registry_page(vec![package_record("e")], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("limit", limit.as_str()))
        .and(query_param("search", "db"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_page(
            vec![package_record("a"), package_record("b")],
            Some("p2"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let servers = fetcher()
        .fetch_all(&servers_url(&server), Some("db"))
        .await
        .unwrap();

    let names: Vec<_> = servers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn test_fetch_all_stops_at_page_guard() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(registry_page(vec![package_record("loop")], Some("again"))),
        )
        .expect(MAX_PAGES_GUARD as u64)
        .mount(&server)
        .await;

    let servers = fetcher()
        .fetch_all(&servers_url(&server), None)
        .await
        .unwrap();

    assert_eq!(servers.len(), MAX_PAGES_GUARD);
}

#[tokio::test]
async fn test_fetch_all_aborts_on_page_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("cursor", "p2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(registry_page(vec![package_record("a")], Some("p2"))),
        )
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch_all(&servers_url(&server), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::HttpStatus { status: 503, .. }));
}
