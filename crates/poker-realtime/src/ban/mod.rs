//! Per-room, time-limited ban lists.

pub mod store;

pub use store::{BanKey, BanStore};
