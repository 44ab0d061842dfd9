//! WebSocket connection handles, the live pool, and display names.

pub mod handle;
pub mod pool;
pub mod registry;

pub use handle::ConnectionHandle;
pub use pool::ConnectionPool;
pub use registry::ConnectionRegistry;
