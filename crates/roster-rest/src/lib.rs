//! # Roster REST
//!
//! REST API layer using Axum for Roster.
//! Maps HTTP requests onto [`roster_service::UserRepository`] and renders
//! its errors; no caching or consistency logic lives here.

pub mod controllers;
pub mod dto;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
