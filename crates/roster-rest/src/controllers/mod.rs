//! Route handlers, one module per resource.

pub mod health_controller;
pub mod metrics_controller;
pub mod user_controller;
