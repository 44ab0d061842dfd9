//! # poker-api
//!
//! HTTP layer for the planning poker server built on Axum.
//!
//! Provides the WebSocket upgrade that feeds the real-time engine, health
//! endpoints, CORS and tracing middleware, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
