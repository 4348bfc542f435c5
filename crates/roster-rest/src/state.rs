//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use roster_service::{CacheLayer, UserRepository};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    /// Used directly only for request counters; record caching goes
    /// through `users`.
    pub cache: Arc<dyn CacheLayer>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(users: Arc<dyn UserRepository>, cache: Arc<dyn CacheLayer>) -> Self {
        Self {
            users,
            cache,
            metrics: None,
        }
    }

    /// Exposes the given Prometheus handle on the metrics route.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
