//! # Roster Server Library
//!
//! Backend wiring and server lifecycle for the Roster binary.

pub mod app;
pub mod shutdown;
pub mod startup;
