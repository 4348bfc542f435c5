//! Per-route request counters kept in the cache.

use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use roster_service::{cache_keys, with_timeout};
use std::time::Duration;
use tracing::debug;

/// Upper bound on the counter update so a slow cache cannot hold up requests.
const COUNTER_TIMEOUT: Duration = Duration::from_millis(250);

/// Counts requests to the user routes. Failures are ignored.
pub async fn user_request_counter(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = cache_keys::request_counter("users");
    match with_timeout(COUNTER_TIMEOUT, || state.cache.increment(&key)).await {
        Ok(count) => debug!("Request counter '{}' at {}", key, count),
        Err(e) => debug!("Request counter '{}' not updated: {}", key, e),
    }

    next.run(request).await
}
