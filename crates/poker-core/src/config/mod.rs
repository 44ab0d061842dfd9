//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field has a default so the server starts with no
//! configuration files at all.

pub mod admin;
pub mod app;
pub mod logging;
pub mod realtime;
pub mod rooms;

use serde::{Deserialize, Serialize};

use self::admin::{ADMIN_SECRET_ENV, AdminConfig};
use self::app::ServerConfig;
use self::logging::LoggingConfig;
use self::realtime::RealtimeConfig;
use self::rooms::RoomsConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// (default.toml + environment overlay + `POKER__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Room lifecycle and moderation settings.
    #[serde(default)]
    pub rooms: RoomsConfig,
    /// Real-time WebSocket settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Admin dashboard access.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `{dir}/default.toml`, `{dir}/{env}.toml`
    /// and environment variables prefixed with `POKER`.
    ///
    /// Missing files are skipped. When no admin secret is configured the
    /// `POKER_ADMIN_SECRET` variable is consulted.
    pub fn load(dir: &str, env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("POKER")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config = Self::build(builder)?;
        if config.admin.secret().is_none() {
            config.admin.secret = std::env::var(ADMIN_SECRET_ENV)
                .ok()
                .filter(|s| !s.is_empty());
        }
        Ok(config)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let config = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.rooms.validate()?;
        Ok(config)
    }
}
