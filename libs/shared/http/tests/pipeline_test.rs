// libs/shared/http/tests/pipeline_test.rs
// Request pipeline over a real reqwest transport against a wiremock server.

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use shared_http::{CallConfig, CallMode, ReqwestTransport, RequestPipeline, TOKEN_FIELD};
use shared_models::{CredentialStore, RequestError};
use shared_utils::MemoryCredentialStore;

fn pipeline_for(server: &MockServer, token: Option<&str>) -> RequestPipeline {
    let store: Arc<dyn CredentialStore> = Arc::new(match token {
        Some(token) => MemoryCredentialStore::with_credential(token),
        None => MemoryCredentialStore::new(),
    });
    RequestPipeline::new(server.uri(), Arc::new(ReqwestTransport::new()), store)
}

#[tokio::test]
async fn test_sends_json_content_type_and_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/doctors"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "d1"}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = pipeline_for(&mock_server, Some("abc123"))
        .execute(CallConfig::get("/api/user/doctors"), CallMode::FullPayload)
        .await;

    assert_eq!(outcome.unwrap(), json!([{"id": "d1"}]));
}

#[tokio::test]
async fn test_omits_authorization_without_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    pipeline_for(&mock_server, None)
        .execute(CallConfig::get("/api/public"), CallMode::FullPayload)
        .await
        .unwrap();

    let received: Vec<Request> = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_payload_extraction_returns_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/video/room"))
        .and(body_json(json!({"roomId": "r-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123", "room": "r-1"})))
        .mount(&mock_server)
        .await;

    let token = pipeline_for(&mock_server, Some("t"))
        .execute(
            CallConfig::post("/api/video/room").body(json!({"roomId": "r-1"}).to_string()),
            CallMode::extract(TOKEN_FIELD),
        )
        .await
        .unwrap();

    assert_eq!(token, json!("abc123"));
}

#[tokio::test]
async fn test_server_error_carries_decoded_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/doctors"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid token"})))
        .mount(&mock_server)
        .await;

    let err = pipeline_for(&mock_server, Some("stale"))
        .execute(CallConfig::get("/api/user/doctors"), CallMode::FullPayload)
        .await
        .unwrap_err();

    assert_matches!(err, RequestError::Server { status: 401, ref body } if *body == json!({"error": "invalid token"}));
}

#[tokio::test]
async fn test_html_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let err = pipeline_for(&mock_server, Some("t"))
        .execute(CallConfig::get("/api/user/doctors"), CallMode::FullPayload)
        .await
        .unwrap_err();

    assert_matches!(err, RequestError::Decode { .. });
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Reserve a port, then close it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::with_credential("t"));
    let pipeline = RequestPipeline::new(
        format!("http://{}", address),
        Arc::new(ReqwestTransport::new()),
        store,
    );

    let err = pipeline
        .execute(CallConfig::get("/api/user/doctors"), CallMode::FullPayload)
        .await
        .unwrap_err();

    assert_matches!(err, RequestError::Transport { .. });
}
