//! Backend health probing.

use async_trait::async_trait;
use serde::Serialize;

/// A component that can report its own health, such as a store or cache.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Component name used in logs and reports.
    fn name(&self) -> &str;

    async fn check(&self) -> HealthStatus;
}

/// Outcome of a probe. Serializes as `{"status": "...", "reason": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Serving, with reduced capability (for example without a cache).
    Degraded(String),
    /// Not able to serve.
    Unhealthy(String),
}

impl HealthStatus {
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    #[must_use]
    pub const fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}
