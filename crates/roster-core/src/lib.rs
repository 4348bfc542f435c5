//! # Roster Core
//!
//! Core types, traits, and error definitions for Roster.
//! Every other crate in the workspace builds on the error taxonomy,
//! the typed user identity, and the `User` record defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
