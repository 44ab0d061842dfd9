//! Shared test helpers for API integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use futures::{SinkExt, StreamExt};
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use poker_api::{AppState, build_router};
use poker_core::config::AppConfig;
use poker_core::traits::clock::SystemClock;
use poker_realtime::RealtimeEngine;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The engine behind the router
    pub engine: Arc<RealtimeEngine>,
    /// Application config
    pub config: AppConfig,
}

/// Decoded test response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.admin.secret = Some("s3cret".to_string());
        let engine = Arc::new(RealtimeEngine::start(&config, Arc::new(SystemClock)));
        let state = AppState::new(Arc::new(config.clone()), engine.clone());
        Self {
            router: build_router(state),
            engine,
            config,
        }
    }

    /// Send a request through the router without a network.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    /// Serve the router on an ephemeral local port.
    pub async fn serve(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self
            .router
            .clone()
            .into_make_service_with_connect_info::<SocketAddr>();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }
}

/// Open a WebSocket to a served app.
pub async fn connect(addr: SocketAddr) -> Socket {
    let (socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    socket
}

/// Send one JSON frame.
pub async fn send(socket: &mut Socket, frame: Value) {
    socket.send(Message::text(frame.to_string())).await.unwrap();
}

/// Read frames until one with `event` arrives and return its data.
pub async fn expect_event(socket: &mut Socket, event: &str) -> Value {
    loop {
        let next = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for frame")
            .expect("socket ended")
            .unwrap();
        if let Message::Text(text) = next {
            let value: Value = serde_json::from_str(text.as_str()).unwrap();
            if value["event"] == event {
                return value["data"].clone();
            }
        }
    }
}

/// Read until the server closes the socket. Returns the events seen first.
pub async fn read_until_closed(socket: &mut Socket) -> Vec<String> {
    let mut events = Vec::new();
    loop {
        let next = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for close");
        match next {
            Some(Ok(Message::Text(text))) => {
                let value: Value = serde_json::from_str(text.as_str()).unwrap();
                events.push(value["event"].as_str().unwrap_or_default().to_string());
            }
            Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return events,
            Some(Ok(_)) => {}
        }
    }
}
