//! JSON serialization for WebSocket messages.

use poker_core::error::AppError;

use super::envelope::{InboundFrame, Rejected, Request};
use super::types::OutboundMessage;

/// Serialize an outbound message to a text frame.
pub fn serialize_outbound(msg: &OutboundMessage) -> Result<String, AppError> {
    Ok(serde_json::to_string(msg)?)
}

/// Deserialize an inbound text frame.
pub fn deserialize_inbound(text: &str) -> Result<Request, Rejected> {
    let frame: InboundFrame = serde_json::from_str(text).map_err(|e| Rejected {
        ack: None,
        event: None,
        error: AppError::from(e),
    })?;
    frame.into_request()
}
