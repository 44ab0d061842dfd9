//! # poker-core
//!
//! Core crate for the planning poker server. Contains configuration
//! schemas, typed identifiers, the clock abstraction used for room and
//! ban lifetimes, and the unified error system.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
