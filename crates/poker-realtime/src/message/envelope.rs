//! Inbound frame envelope: event name, payload, optional ack id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use poker_core::error::AppError;

use super::types::InboundMessage;

/// Raw inbound frame before the payload is matched to an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundFrame {
    /// Event name.
    pub event: String,
    /// Event payload.
    #[serde(default)]
    pub data: Value,
    /// Acknowledgment id the client waits on.
    #[serde(default)]
    pub ack: Option<u64>,
}

impl InboundFrame {
    /// Matches the payload to its event.
    pub fn into_request(self) -> Result<Request, Rejected> {
        let ack = self.ack;
        let data = match self.data {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let tagged = serde_json::json!({ "event": &self.event, "data": data });
        serde_json::from_value::<InboundMessage>(tagged)
            .map(|message| Request { message, ack })
            .map_err(|e| Rejected {
                ack,
                event: Some(self.event),
                error: AppError::from(e),
            })
    }
}

/// A decoded client request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// The event.
    pub message: InboundMessage,
    /// Ack id to answer, if the client asked for one.
    pub ack: Option<u64>,
}

impl Request {
    /// A request without an ack id.
    pub fn new(message: InboundMessage) -> Self {
        Self { message, ack: None }
    }

    /// A request answered through ack `id`.
    pub fn with_ack(message: InboundMessage, id: u64) -> Self {
        Self {
            message,
            ack: Some(id),
        }
    }
}

/// A frame that could not be decoded.
#[derive(Debug, Clone)]
pub struct Rejected {
    /// Ack id, when the envelope itself was readable.
    pub ack: Option<u64>,
    /// Event name, when the envelope itself was readable.
    pub event: Option<String>,
    /// Why decoding failed.
    pub error: AppError,
}
