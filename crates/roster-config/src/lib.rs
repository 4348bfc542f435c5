//! # Roster Config
//!
//! Configuration management for Roster.
//! Supports layered configuration from files and environment variables,
//! with validation on every load.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
