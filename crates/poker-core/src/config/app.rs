//! Listener, shutdown, and browser-origin settings.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Where the server listens and how it winds down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind, e.g. `0.0.0.0`.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port shared by the HTTP routes and the `/ws` upgrade.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds the engine gets to close sockets after a shutdown signal.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
    /// Browser origins allowed to call the server. Empty or `"*"` allows any.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// How long browsers may cache a preflight answer.
    #[serde(default = "default_preflight_max_age")]
    pub cors_max_age_seconds: u64,
}

impl ServerConfig {
    /// Parsed `host:port`.
    pub fn bind_address(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::configuration(format!("Invalid bind address: {e}")))
    }

    /// Whether every origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_seconds: default_shutdown_grace(),
            cors_origins: Vec::new(),
            cors_max_age_seconds: default_preflight_max_age(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3001
}

fn default_shutdown_grace() -> u64 {
    10
}

fn default_preflight_max_age() -> u64 {
    60 * 60
}
