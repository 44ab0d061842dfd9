//! WebSocket message types, framing, serialization, and validation.

pub mod envelope;
pub mod serializer;
pub mod types;
pub mod validator;

pub use envelope::{InboundFrame, Rejected, Request};
pub use types::{InboundMessage, OutboundMessage, is_privileged_event};
