//! Request id generation.

use axum::http::{HeaderValue, Request};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::request_id::{MakeRequestId, RequestId};

/// Issues `req-<n>` ids to requests that arrive without an `x-request-id`.
#[derive(Debug, Clone, Default)]
pub struct MakeRequestSequence {
    next: Arc<AtomicU64>,
}

impl MakeRequestId for MakeRequestSequence {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        HeaderValue::from_str(&format!("req-{}", n))
            .ok()
            .map(RequestId::new)
    }
}
