//! # poker-realtime
//!
//! Real-time room engine for the planning poker server. Provides:
//!
//! - Connection pool and per-connection outbound queues
//! - Connection registry (display names)
//! - Room store with ownership, membership, and voting round state
//! - Per-room, time-limited ban store
//! - Session coordinator driven by a single-consumer mailbox
//! - Lifecycle sweeper and per-room TTL expiry
//! - Shared-secret admin façade

pub mod admin;
pub mod ban;
pub mod channel;
pub mod connection;
pub mod coordinator;
pub mod message;
pub mod metrics;
pub mod room;
pub mod server;
pub mod sweeper;

pub use connection::pool::ConnectionPool;
pub use coordinator::SessionCoordinator;
pub use coordinator::mailbox::{Command, CoordinatorHandle};
pub use server::RealtimeEngine;
