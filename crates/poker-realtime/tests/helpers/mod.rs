//! Shared test helpers for coordinator integration tests.

#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;

use poker_core::config::AppConfig;
use poker_core::traits::clock::ManualClock;
use poker_core::types::{ConnectionId, RoomId};
use poker_realtime::connection::ConnectionHandle;
use poker_realtime::message::{InboundMessage, OutboundMessage, Request};
use poker_realtime::metrics::EngineMetrics;
use poker_realtime::{ConnectionPool, SessionCoordinator};

/// Admin secret configured by [`test_config`].
pub const ADMIN_SECRET: &str = "s3cret";

/// Default config with an admin secret.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.admin.secret = Some(ADMIN_SECRET.to_string());
    config
}

/// A coordinator wired to an in-memory pool and a manual clock.
pub struct Harness {
    pub coordinator: SessionCoordinator,
    pub pool: Arc<ConnectionPool>,
    pub metrics: Arc<EngineMetrics>,
    pub clock: ManualClock,
}

/// A test client: its handle plus the receiving end of its outbound queue.
pub struct Client {
    pub id: ConnectionId,
    pub handle: Arc<ConnectionHandle>,
    rx: mpsc::Receiver<String>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let pool = Arc::new(ConnectionPool::new());
        let metrics = Arc::new(EngineMetrics::new());
        let clock = ManualClock::default();
        let coordinator =
            SessionCoordinator::new(&config, Arc::new(clock.clone()), pool.clone(), metrics.clone());
        Self {
            coordinator,
            pool,
            metrics,
            clock,
        }
    }

    /// Opens a connection without an address.
    pub fn connect(&self) -> Client {
        self.connect_from(None)
    }

    /// Opens a connection from `address`.
    pub fn connect_from(&self, address: Option<&str>) -> Client {
        let address: Option<IpAddr> = address.map(|a| a.parse().unwrap());
        let (handle, rx) = ConnectionHandle::new(address, 1024);
        let handle = Arc::new(handle);
        self.pool.add(handle.clone());
        Client {
            id: handle.id,
            handle,
            rx,
        }
    }

    pub fn send(&mut self, client: &Client, message: InboundMessage) {
        self.coordinator.handle(client.id, Request::new(message));
    }

    pub fn send_acked(&mut self, client: &Client, message: InboundMessage, ack: u64) {
        self.coordinator.handle(client.id, Request::with_ack(message, ack));
    }

    pub fn register(&mut self, client: &Client, name: &str) {
        self.send(
            client,
            InboundMessage::Register {
                name: Some(name.to_string()),
            },
        );
    }

    /// Creates a room as `client` and returns its id.
    pub fn create_room(&mut self, client: &Client, name: &str) -> RoomId {
        self.create_room_sized(client, name, None)
    }

    pub fn create_room_sized(&mut self, client: &Client, name: &str, max_users: Option<u64>) -> RoomId {
        let before = self.coordinator.rooms().ids();
        self.send(
            client,
            InboundMessage::CreateRoom {
                room_name: Some(name.to_string()),
                max_users,
                user_name: None,
            },
        );
        self.coordinator
            .rooms()
            .ids()
            .into_iter()
            .find(|id| !before.contains(id))
            .expect("room was not created")
    }

    pub fn join(&mut self, client: &Client, room_id: RoomId) {
        self.send(
            client,
            InboundMessage::JoinRoom {
                room_id,
                user_name: None,
            },
        );
    }

    pub fn vote(&mut self, client: &Client, room_id: RoomId, vote: &str) {
        self.send(
            client,
            InboundMessage::Vote {
                room_id,
                vote: Value::String(vote.to_string()),
            },
        );
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

impl Client {
    /// Every frame queued so far, decoded.
    pub fn drain(&mut self) -> Vec<OutboundMessage> {
        let mut out = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            out.push(serde_json::from_str(&frame).expect("outbound frame is valid JSON"));
        }
        out
    }

    /// Raw frames queued so far.
    pub fn drain_raw(&mut self) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            out.push(serde_json::from_str(&frame).expect("outbound frame is valid JSON"));
        }
        out
    }

    /// Messages of the `roomError` kind, by text.
    pub fn errors(&mut self) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter_map(|msg| match msg {
                OutboundMessage::RoomError { message } => Some(message),
                _ => None,
            })
            .collect()
    }
}
