//! Main application router.

use crate::{
    controllers::{health_controller, metrics_controller, user_controller},
    middleware::{logging_middleware, user_request_counter, MakeRequestSequence},
    state::AppState,
};
use axum::{http::HeaderValue, middleware, routing::get, Router};
use roster_config::{ObservabilityConfig, ServerConfig};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the main application router.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    observability: &ObservabilityConfig,
) -> Router {
    let cors = create_cors_layer(server_config);

    let api_router = Router::new()
        .nest("/users", user_controller::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_request_counter,
        ));

    let mut router = Router::new()
        .merge(health_controller::router())
        .nest("/api/v1", api_router)
        .route("/", get(root));

    if observability.metrics_enabled {
        router = router.merge(metrics_controller::router(&observability.metrics_path));
    }

    let router = router
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(cors)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestSequence::default()))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    info!("Router created with REST endpoints under /api/v1");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Roster API v1"
}
