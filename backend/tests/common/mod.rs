#![allow(dead_code)]
use std::net::SocketAddr;
use std::time::Duration;

use chrono_tz::America::Sao_Paulo;
use despacho_backend::{
    api, gate::ServiceGate, notify::Notifier, store::SessionStore, AppState,
};

pub const SUPERVISOR_PHONE: &str = "5511999999999";

/// Spin up a real Axum server on a random port with the gate forced open
/// (closing hour 24 never arrives). State is in-memory, so tests are isolated
/// by simply creating their own sessions.
pub async fn setup_test_app() -> SocketAddr {
    spawn_app(24).await
}

/// Same app with the gate forced closed (closing hour 0 is always past).
pub async fn setup_closed_app() -> SocketAddr {
    spawn_app(0).await
}

async fn spawn_app(closing_hour: u32) -> SocketAddr {
    let state = AppState {
        store: SessionStore::new(Duration::from_secs(600)),
        gate: ServiceGate::new(Sao_Paulo, closing_hour),
        notifier: Notifier::new(None).expect("Failed to build notifier"),
        supervisor_phone: SUPERVISOR_PHONE.to_string(),
    };

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Build a reqwest client (reusable across requests in a test).
pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Create a session via the HTTP API and return (id, initial state).
pub async fn create_session(addr: SocketAddr) -> (String, serde_json::Value) {
    let resp = http_client()
        .post(format!("http://{}/api/sessions", addr))
        .send()
        .await
        .expect("Session create request failed");
    assert_eq!(resp.status(), 200, "Session create should return 200");

    let body: serde_json::Value = resp.json().await.expect("Failed to parse session");
    let id = body["id"]
        .as_str()
        .expect("Response should contain an id")
        .to_string();
    (id, body)
}

/// Post one form event and return the raw response.
pub async fn post_event(
    addr: SocketAddr,
    id: &str,
    evento: serde_json::Value,
) -> reqwest::Response {
    http_client()
        .post(format!("http://{}/api/sessions/{}/events", addr, id))
        .json(&evento)
        .send()
        .await
        .expect("Event request failed")
}

/// Post one form event, asserting it succeeds, and return the updated state.
pub async fn apply_event(
    addr: SocketAddr,
    id: &str,
    evento: serde_json::Value,
) -> serde_json::Value {
    let resp = post_event(addr, id, evento).await;
    assert_eq!(resp.status(), 200, "Event should be accepted");
    resp.json().await.expect("Failed to parse session")
}
