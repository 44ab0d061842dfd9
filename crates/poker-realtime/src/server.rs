//! Top-level real-time engine that ties together all subsystems.

use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use poker_core::AppResult;
use poker_core::config::AppConfig;
use poker_core::config::realtime::RealtimeConfig;
use poker_core::traits::clock::Clock;
use poker_core::types::ConnectionId;

use crate::connection::{ConnectionHandle, ConnectionPool};
use crate::coordinator::mailbox::CoordinatorHandle;
use crate::coordinator::{CoordinatorStats, SessionCoordinator, actor};
use crate::message::Rejected;
use crate::message::serializer::deserialize_inbound;
use crate::message::validator::validate_inbound;
use crate::metrics::{EngineMetrics, MetricsSnapshot};
use crate::sweeper::spawn_sweeper;

pub use crate::coordinator::MALFORMED_REQUEST;

/// Central real-time engine: connection pool, coordinator task, sweeper.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Live connections.
    pub pool: Arc<ConnectionPool>,
    /// Metrics collector.
    pub metrics: Arc<EngineMetrics>,
    coordinator: CoordinatorHandle,
    config: RealtimeConfig,
    shutdown: CancellationToken,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.pool.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Spawns the coordinator and sweeper tasks. Must run inside a tokio runtime.
    pub fn start(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let pool = Arc::new(ConnectionPool::new());
        let metrics = Arc::new(EngineMetrics::new());
        let shutdown = CancellationToken::new();

        let coordinator = SessionCoordinator::new(config, clock, pool.clone(), metrics.clone());
        let (handle, rx) = CoordinatorHandle::channel(config.realtime.mailbox_size);

        let actor_task = tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                actor::run(coordinator, rx, shutdown).await;
            }
        });
        let sweeper_task = spawn_sweeper(
            handle.clone(),
            config.rooms.sweep_interval(),
            shutdown.clone(),
        );

        info!(
            max_rooms = config.rooms.max_rooms,
            room_ttl_secs = config.rooms.room_ttl_seconds,
            sweep_secs = config.rooms.sweep_interval().as_secs(),
            admin_enabled = config.admin.secret().is_some(),
            "Real-time engine initialized"
        );

        Self {
            pool,
            metrics,
            coordinator: handle,
            config: config.realtime.clone(),
            shutdown,
            tasks: Arc::new(Mutex::new(vec![actor_task, sweeper_task])),
        }
    }

    /// Registers a new connection.
    ///
    /// Returns the handle and the receiver of its outbound frames.
    pub fn connect(
        &self,
        address: Option<IpAddr>,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (handle, rx) = ConnectionHandle::new(address, self.config.channel_buffer_size);
        let handle = Arc::new(handle);
        self.pool.add(handle.clone());
        self.metrics.connection_opened();
        info!(
            conn_id = %handle.id,
            address = ?address,
            "WebSocket connection registered"
        );
        (handle, rx)
    }

    /// Decodes one text frame and queues it for the coordinator.
    ///
    /// Frames that cannot be decoded are queued too, so the coordinator
    /// can answer them with [`MALFORMED_REQUEST`] in order with the
    /// connection's other requests.
    pub async fn handle_inbound(&self, conn_id: ConnectionId, raw: &str) -> AppResult<()> {
        self.metrics.inc_received();

        let decoded = validate_inbound(raw, self.config.max_message_bytes)
            .map_err(|error| Rejected {
                ack: None,
                event: None,
                error,
            })
            .and_then(|()| deserialize_inbound(raw));

        match decoded {
            Ok(request) => self.coordinator.dispatch(conn_id, request).await,
            Err(rejected) => self.coordinator.reject(conn_id, rejected).await,
        }
    }

    /// Tells the coordinator a connection closed.
    pub async fn disconnect(&self, conn_id: ConnectionId) {
        if self.coordinator.disconnected(conn_id).await.is_err() {
            if let Some(handle) = self.pool.remove(&conn_id) {
                handle.close();
                self.metrics.connection_closed();
            }
        }
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Coordinator counts (rooms, members, admins, bans).
    pub async fn stats(&self) -> AppResult<CoordinatorStats> {
        self.coordinator.stats().await
    }

    /// Metric counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Cloneable handle to the coordinator mailbox.
    pub fn coordinator(&self) -> CoordinatorHandle {
        self.coordinator.clone()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Stops the coordinator and sweeper and closes every connection.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.shutdown.cancel();

        let tasks: Vec<JoinHandle<()>> = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Engine task ended abnormally");
            }
        }

        let closed = self.pool.close_all();
        info!(closed, "Real-time engine shut down");
    }
}
