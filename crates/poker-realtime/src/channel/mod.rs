//! Room broadcast groups and the per-connection subscription index.

pub mod group;
pub mod registry;
pub mod subscription;

pub use registry::ChannelRegistry;
