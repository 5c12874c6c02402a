// libs/video-session-cell/tests/session_test.rs
// Session controller lifecycle against scripted and mocked transports.

use std::sync::Arc;

use assert_matches::assert_matches;
use http::Method;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_http::ReqwestTransport;
use shared_models::RequestError;
use shared_utils::test_utils::{RecordingTransport, TestConfig};
use video_session_cell::{SessionController, SessionError, SessionState, VideoRoomService};

const ROOM_PATH: &str = "/api/video/room";

fn controller_with(transport: Arc<RecordingTransport>) -> (SessionController, TestConfig) {
    let config = TestConfig::default();
    let (pipeline, _) = config.pipeline(transport, Some("user-token"));
    let rooms = VideoRoomService::new(pipeline, config.video_room_id);
    (SessionController::new(rooms), config)
}

async fn wait_for_calls(transport: &RecordingTransport, count: usize) {
    while transport.call_count() < count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_start_activates_with_room_token() {
    let transport = Arc::new(
        RecordingTransport::new().respond(Method::POST, ROOM_PATH, 200, json!({"token": "abc123"})),
    );
    let (controller, config) = controller_with(transport.clone());

    let session = controller.start().await.unwrap();

    assert!(session.is_active());
    assert_eq!(session.credential().unwrap().as_str(), "abc123");
    assert_matches!(controller.state(), SessionState::Active { room_id, .. } if room_id == config.video_room_id);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.headers["authorization"], "Bearer user-token");
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"roomId": config.video_room_id}));
}

#[tokio::test]
async fn test_start_finish_cycle_always_returns_to_idle() {
    let transport = Arc::new(
        RecordingTransport::new().respond(Method::POST, ROOM_PATH, 200, json!({"token": "abc123"})),
    );
    let (controller, _) = controller_with(transport.clone());

    for _ in 0..5 {
        controller.start().await.unwrap();
        assert!(controller.finish());

        let snapshot = controller.snapshot();
        assert!(!snapshot.is_active());
        assert!(snapshot.credential().is_none());
        assert_eq!(controller.state(), SessionState::Idle);
    }
    assert_eq!(transport.call_count(), 5);
}

#[tokio::test]
async fn test_finish_when_idle_is_a_no_op() {
    let (controller, _) = controller_with(Arc::new(RecordingTransport::new()));
    assert!(!controller.finish());
    assert!(!controller.remote_hangup());
    assert_eq!(controller.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_remote_hangup_ends_session() {
    let transport = Arc::new(
        RecordingTransport::new().respond(Method::POST, ROOM_PATH, 200, json!({"token": "abc123"})),
    );
    let (controller, _) = controller_with(transport);

    controller.start().await.unwrap();
    assert!(controller.remote_hangup());
    assert!(controller.snapshot().credential().is_none());
}

#[tokio::test]
async fn test_transport_failure_keeps_idle() {
    let transport = Arc::new(RecordingTransport::failing("connection refused"));
    let (controller, _) = controller_with(transport);

    let err = controller.start().await.unwrap_err();

    assert_matches!(err, SessionError::Request(RequestError::Transport { .. }));
    assert_eq!(controller.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_failed_room_creation_surfaces_decode_error() {
    let transport = Arc::new(RecordingTransport::new().respond(
        Method::POST,
        ROOM_PATH,
        500,
        json!({"error": "room service unavailable"}),
    ));
    let (controller, _) = controller_with(transport);

    let err = controller.start().await.unwrap_err();

    assert_matches!(err, SessionError::Request(RequestError::Decode { .. }));
    assert!(!controller.snapshot().is_active());
}

#[tokio::test]
async fn test_start_while_active_does_not_call_network() {
    let transport = Arc::new(
        RecordingTransport::new().respond(Method::POST, ROOM_PATH, 200, json!({"token": "abc123"})),
    );
    let (controller, _) = controller_with(transport.clone());

    controller.start().await.unwrap();
    let err = controller.start().await.unwrap_err();

    assert_matches!(err, SessionError::AlreadyActive);
    assert_eq!(transport.call_count(), 1);
    assert_eq!(controller.snapshot().credential().unwrap().as_str(), "abc123");
}

#[tokio::test]
async fn test_second_start_while_in_flight_is_rejected() {
    let transport = Arc::new(
        RecordingTransport::gated().respond(Method::POST, ROOM_PATH, 200, json!({"token": "first"})),
    );
    let (controller, _) = controller_with(transport.clone());

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.start().await }
    });
    wait_for_calls(&transport, 1).await;

    assert_matches!(controller.start().await, Err(SessionError::StartInProgress));

    transport.release(1);
    let session = pending.await.unwrap().unwrap();
    assert_eq!(session.credential().unwrap().as_str(), "first");
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_completion_after_detach_is_discarded() {
    let transport = Arc::new(
        RecordingTransport::gated().respond(Method::POST, ROOM_PATH, 200, json!({"token": "late"})),
    );
    let (controller, _) = controller_with(transport.clone());
    let mut updates = controller.subscribe();

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.start().await }
    });
    wait_for_calls(&transport, 1).await;

    controller.detach();
    transport.release(1);

    assert_matches!(pending.await.unwrap(), Err(SessionError::Detached));
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(!updates.has_changed().unwrap());
    assert!(!updates.borrow_and_update().is_active());
}

#[tokio::test]
async fn test_start_after_detach_never_reaches_network() {
    let transport = Arc::new(
        RecordingTransport::new().respond(Method::POST, ROOM_PATH, 200, json!({"token": "abc123"})),
    );
    let (controller, _) = controller_with(transport.clone());

    controller.detach();

    assert!(!controller.is_attached());
    assert_matches!(controller.start().await, Err(SessionError::Detached));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_detach_ends_active_session() {
    let transport = Arc::new(
        RecordingTransport::new().respond(Method::POST, ROOM_PATH, 200, json!({"token": "abc123"})),
    );
    let (controller, _) = controller_with(transport);

    controller.start().await.unwrap();
    controller.detach();

    assert_eq!(controller.state(), SessionState::Idle);
    assert!(!controller.liveness().is_alive());
}

#[tokio::test]
async fn test_subscribers_observe_transitions() {
    let transport = Arc::new(
        RecordingTransport::new().respond(Method::POST, ROOM_PATH, 200, json!({"token": "abc123"})),
    );
    let (controller, _) = controller_with(transport);
    let mut updates = controller.subscribe();

    controller.start().await.unwrap();
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().credential().unwrap().as_str(), "abc123");

    controller.finish();
    assert!(updates.has_changed().unwrap());
    assert!(!updates.borrow_and_update().is_active());
}

#[tokio::test]
async fn test_start_against_http_server() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_base_url(mock_server.uri());

    Mock::given(method("POST"))
        .and(path(ROOM_PATH))
        .and(header("authorization", "Bearer user-token"))
        .and(body_json(json!({"roomId": config.video_room_id})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (pipeline, _) = config.pipeline(Arc::new(ReqwestTransport::new()), Some("user-token"));
    let controller = SessionController::new(VideoRoomService::from_config(pipeline, &config.to_app_config()));

    let session = controller.start().await.unwrap();
    assert_eq!(session.credential().unwrap().as_str(), "abc123");
}
