// Integration tests for `DiscoveryClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sightline_api::{DiscoveryClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DiscoveryClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).expect("mock server uri");
    let client = DiscoveryClient::from_reqwest(base, reqwest::Client::new());
    (server, client)
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_streams_returns_stream_ids() {
    let (server, client) = setup().await;

    let body = json!({
        "front-door": { "producers": [], "consumers": [] },
        "loading_dock": { "producers": [], "consumers": [] },
        "lobby": { "producers": [], "consumers": [] },
    });

    Mock::given(method("GET"))
        .and(path("/api/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let mut streams = client.list_streams().await.expect("streams");
    streams.sort();
    assert_eq!(streams, vec!["front-door", "loading_dock", "lobby"]);
}

// ── Failure modes ───────────────────────────────────────────────────

#[tokio::test]
async fn empty_stream_map_is_an_explicit_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client.list_streams().await.expect_err("should fail");
    assert!(matches!(err, Error::NoStreams));
}

#[tokio::test]
async fn http_error_surfaces_as_discovery_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/streams"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.list_streams().await.expect_err("should fail");
    assert!(matches!(err, Error::Discovery { .. }));
}

#[tokio::test]
async fn non_object_body_is_a_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "a", "map"])))
        .mount(&server)
        .await;

    let err = client.list_streams().await.expect_err("should fail");
    assert!(matches!(err, Error::Deserialization(_)));
}
