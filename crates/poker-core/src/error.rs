//! The error type shared by every crate in the workspace.
//!
//! Coordinator failures carry the exact text shown to clients, so
//! `message` is user-facing and `kind` decides how it is delivered.

use std::fmt;
use thiserror::Error;

/// What went wrong, independent of the wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The room (or member) is gone.
    NotFound,
    /// Caller lacks ownership or admin privilege. Never reported to clients.
    Authorization,
    /// Payload or field values were rejected.
    Validation,
    /// Room limit reached or room full.
    Capacity,
    /// Caller is banned from the room.
    Banned,
    /// Connection tried to join before registering a name.
    Unregistered,
    /// A frame could not be encoded or decoded.
    Serialization,
    /// Startup configuration is unusable.
    Configuration,
    /// Bug or I/O failure on our side.
    Internal,
    /// The coordinator is not accepting work (shutting down).
    ServiceUnavailable,
}

impl ErrorKind {
    /// Stable upper-case code used in logs.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authorization => "AUTHORIZATION",
            Self::Validation => "VALIDATION",
            Self::Capacity => "CAPACITY",
            Self::Banned => "BANNED",
            Self::Unregistered => "UNREGISTERED",
            Self::Serialization => "SERIALIZATION",
            Self::Configuration => "CONFIGURATION",
            Self::Internal => "INTERNAL",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A categorized failure with a client-facing message.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Category.
    pub kind: ErrorKind,
    /// Text sent to the client in `roomError` or a failed ack.
    pub message: String,
    /// Lower-level cause, kept for logs only.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )+
    };
}

impl AppError {
    /// An error without an underlying cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// An error wrapping the failure that caused it.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        let mut err = Self::new(kind, message);
        err.source = Some(Box::new(source));
        err
    }

    kind_constructors! {
        /// Missing room or member.
        not_found => NotFound;
        /// Not the owner, or not an admin.
        authorization => Authorization;
        /// Rejected input.
        validation => Validation;
        /// Room limit or room capacity reached.
        capacity => Capacity;
        /// Caller is banned.
        banned => Banned;
        /// Caller has no registered name.
        unregistered => Unregistered;
        /// Unusable configuration.
        configuration => Configuration;
        /// Failure on our side.
        internal => Internal;
        /// Coordinator unavailable.
        service_unavailable => ServiceUnavailable;
    }

    /// Whether this error must be swallowed instead of reported to the caller.
    pub fn is_silent(&self) -> bool {
        self.kind == ErrorKind::Authorization
    }
}

// The boxed source is not `Clone`; clones keep only kind and message.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let message = format!("Invalid JSON frame: {err}");
        Self::with_source(ErrorKind::Serialization, message, err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        let message = format!("Cannot load configuration: {err}");
        Self::with_source(ErrorKind::Configuration, message, err)
    }
}
