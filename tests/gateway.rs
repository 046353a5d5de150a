//! Gateway tests
//!
//! HTTP routes are driven in-process through `tower::ServiceExt::oneshot`.
//! The state stream is exercised against a real listener on an ephemeral
//! port with a WebSocket client.
//!
//! Run with: `cargo test --test gateway`

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures_util::StreamExt;
use kshetra::config::CommandConfig;
use kshetra::gateway::{AppState, router, serve_with_listener};
use kshetra::sim::{Arena, EpisodeConfig, ObstacleSpec, RewardConfig, SensorConfig, Simulator};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::connect_async;
use tower::ServiceExt;

// ============================================================================
// Helpers
// ============================================================================

const TEST_TICK: Duration = Duration::from_millis(10);
const WAIT: Duration = Duration::from_secs(5);

fn test_state(arena: Arena) -> Arc<AppState> {
    let sim = Simulator::new(
        arena,
        SensorConfig::default(),
        RewardConfig::default(),
        EpisodeConfig::default(),
    );
    Arc::new(AppState::new(sim, CommandConfig::default(), TEST_TICK))
}

fn wall_ahead() -> Arena {
    Arena::from_specs(&[ObstacleSpec::new(0.0, 0.55, 2.0, 0.5)])
}

async fn post_json(state: &Arc<AppState>, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(state, request).await
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Start a gateway on an ephemeral port. Dropping the sender stops it.
async fn spawn_gateway(state: Arc<AppState>) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(serve_with_listener(listener, state, async move {
        let _ = rx.await;
    }));
    (addr, tx)
}

type Client =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn next_json(ws: &mut Client) -> Value {
    let msg = tokio::time::timeout(WAIT, ws.next())
        .await
        .expect("timed out waiting for frame")
        .expect("stream ended")
        .expect("websocket error");
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

// ============================================================================
// HTTP routes
// ============================================================================

#[tokio::test]
async fn action_applies_command() {
    let state = test_state(Arena::default());
    let (status, json) = post_json(&state, "/action", r#"{"v": 0.1, "w": 0.0}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["done"], false);
    assert_eq!(json["info"]["steps"], 1);
    assert_eq!(json["info"]["collisions"], 0);
    assert!(json["info"]["minDist"].as_f64().unwrap() >= 0.25);
    assert_eq!(json["sensors"]["beams"], 13);
    assert_eq!(json["sensors"]["distances"].as_array().unwrap().len(), 13);
    assert!((json["reward"].as_f64().unwrap() - 0.1).abs() < 1e-6);
}

#[tokio::test]
async fn action_with_garbage_body_uses_defaults() {
    let state = test_state(Arena::default());
    let request = Request::builder()
        .method("POST")
        .uri("/action")
        .body(Body::from("definitely not json"))
        .unwrap();
    let (status, json) = send(&state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["info"]["steps"], 1);
    // Default command is v=0.05, w=0
    assert!((json["reward"].as_f64().unwrap() - 0.05).abs() < 1e-6);

    let obs = state.observe();
    assert!((obs.pose.z - 0.05).abs() < 1e-6);
    assert_eq!(obs.pose.x, 0.0);
}

#[tokio::test]
async fn action_with_partial_body() {
    let state = test_state(Arena::default());
    let (_, json) = post_json(&state, "/action", r#"{"w": 0.2}"#).await;
    assert_eq!(json["info"]["steps"], 1);

    let obs = state.observe();
    assert!((obs.pose.yaw - 0.2).abs() < 1e-6);
}

#[tokio::test]
async fn action_applies_extreme_numbers_as_sent() {
    let state = test_state(Arena::empty());
    let (_, json) = post_json(&state, "/action", r#"{"v": 1e39, "w": 0}"#).await;
    assert_eq!(json["info"]["steps"], 1);
    assert_eq!(json["reward"].as_f64().unwrap(), 1e39);
    assert_eq!(state.observe().pose.z, 1e39);

    post_json(&state, "/reset", "").await;
    post_json(&state, "/action", r#"{"v": 1e-46}"#).await;
    assert_eq!(state.observe().pose.z, 1e-46);
}

#[tokio::test]
async fn collisions_reported_over_http() {
    let state = test_state(wall_ahead());
    let mut last = Value::Null;
    for _ in 0..5 {
        let (_, json) = post_json(&state, "/action", r#"{"v": 0.1}"#).await;
        last = json;
    }
    assert_eq!(last["info"]["collisions"], 5);
    assert_eq!(last["info"]["steps"], 5);
    assert_eq!(last["done"], true);
    assert!(last["reward"].as_f64().unwrap() < 0.0);
}

#[tokio::test]
async fn reset_clears_episode() {
    let state = test_state(wall_ahead());
    post_json(&state, "/action", r#"{"v": 0.1}"#).await;
    post_json(&state, "/action", r#"{"v": -0.1, "w": 0.5}"#).await;

    let (status, json) = post_json(&state, "/reset", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"ok": true}));

    let obs = state.observe();
    assert_eq!(obs.pose.x, 0.0);
    assert_eq!(obs.pose.z, 0.0);
    assert_eq!(obs.pose.yaw, 0.0);
    assert_eq!(obs.reward, 0.0);
    assert!(!obs.done);

    let (_, json) = post_json(&state, "/action", "{}").await;
    assert_eq!(json["info"]["steps"], 1);
    assert_eq!(json["info"]["collisions"], 0);
}

#[tokio::test]
async fn health_reports_ok() {
    let state = test_state(Arena::default());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&state, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let state = test_state(Arena::default());
    let request = Request::builder()
        .method("POST")
        .uri("/action")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::from("{}"))
        .unwrap();
    let response = router(state).oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

// ============================================================================
// State stream
// ============================================================================

#[tokio::test]
async fn stream_sends_hello_then_state() {
    let state = test_state(Arena::default());
    let (addr, _shutdown) = spawn_gateway(state.clone()).await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    let hello = next_json(&mut ws).await;
    assert_eq!(hello, serde_json::json!({"type": "hello"}));

    let frame = next_json(&mut ws).await;
    assert_eq!(frame["type"], "state");
    assert_eq!(frame["pose"], serde_json::json!({"x": 0.0, "z": 0.0, "yaw": 0.0}));
    assert_eq!(frame["sensors"]["distances"].as_array().unwrap().len(), 13);
    assert_eq!(frame["done"], false);
}

#[tokio::test]
async fn first_state_waits_one_period() {
    let period = Duration::from_millis(200);
    let sim = Simulator::new(
        Arena::default(),
        SensorConfig::default(),
        RewardConfig::default(),
        EpisodeConfig::default(),
    );
    let state = Arc::new(AppState::new(sim, CommandConfig::default(), period));
    let (addr, _shutdown) = spawn_gateway(state).await;

    let started = Instant::now();
    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    assert_eq!(next_json(&mut ws).await["type"], "hello");
    assert_eq!(next_json(&mut ws).await["type"], "state");
    assert!(
        started.elapsed() >= period,
        "first state after {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn stream_reflects_applied_commands() {
    let state = test_state(Arena::default());
    let (addr, _shutdown) = spawn_gateway(state.clone()).await;
    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    next_json(&mut ws).await;

    post_json(&state, "/action", r#"{"v": 0.1}"#).await;

    // Frames queued before the command may still arrive; the new pose must show up
    let mut seen = false;
    for _ in 0..50 {
        let frame = next_json(&mut ws).await;
        let z = frame["pose"]["z"].as_f64().unwrap();
        if (z - 0.1).abs() < 1e-6 {
            assert!((frame["reward"].as_f64().unwrap() - 0.1).abs() < 1e-6);
            seen = true;
            break;
        }
    }
    assert!(seen, "state stream never reported the moved pose");
}

#[tokio::test]
async fn subscribers_are_independent() {
    let state = test_state(Arena::default());
    let (addr, _shutdown) = spawn_gateway(state.clone()).await;
    let url = format!("ws://{}/ws", addr);

    let (mut first, _) = connect_async(url.as_str()).await.unwrap();
    let (mut second, _) = connect_async(url.as_str()).await.unwrap();
    assert_eq!(next_json(&mut first).await["type"], "hello");
    assert_eq!(next_json(&mut second).await["type"], "hello");
    assert_eq!(next_json(&mut second).await["type"], "state");
    assert_eq!(state.subscriber_count(), 2);

    drop(first);

    // The remaining subscriber keeps streaming
    for _ in 0..3 {
        assert_eq!(next_json(&mut second).await["type"], "state");
    }

    tokio::time::timeout(WAIT, async {
        while state.subscriber_count() != 1 {
            tokio::time::sleep(TEST_TICK).await;
        }
    })
    .await
    .expect("closed subscriber was never released");
}
