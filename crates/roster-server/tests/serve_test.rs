//! Cache wiring and serve-loop lifecycle.

use axum::{routing::get, Router};
use roster_config::{AppConfig, CacheBackend};
use roster_repository::MemoryUserStore;
use roster_rest::{create_router, AppState};
use roster_server::app::{build_cache, check_cache, serve};
use roster_service::{CacheLayer, CoordinatorOptions, MemoryCache, UserCoordinator};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

fn config_with_backend(backend: CacheBackend) -> AppConfig {
    let mut config = AppConfig::default();
    config.cache.backend = backend;
    config
}

#[test]
fn test_memory_backend() {
    let handles = build_cache(&config_with_backend(CacheBackend::Memory)).unwrap();
    assert_eq!(handles.cache.backend_name(), "memory");
    assert!(handles.redis.is_none());
}

#[test]
fn test_disabled_backend() {
    let handles = build_cache(&config_with_backend(CacheBackend::Disabled)).unwrap();
    assert_eq!(handles.cache.backend_name(), "disabled");
    assert!(handles.redis.is_none());
}

#[tokio::test]
async fn test_redis_backend_keeps_handle() {
    let handles = build_cache(&config_with_backend(CacheBackend::Redis)).unwrap();
    assert_eq!(handles.cache.backend_name(), "redis");
    assert!(handles.redis.is_some());
}

#[tokio::test]
async fn test_unreachable_cache_is_not_fatal() {
    let mut config = config_with_backend(CacheBackend::Redis);
    config.redis.url = "redis://127.0.0.1:1/0".to_string();
    let handles = build_cache(&config).unwrap();

    assert!(!check_cache(handles.cache.as_ref(), Duration::from_secs(2)).await);
    assert!(check_cache(&MemoryCache::new(), Duration::from_secs(1)).await);
}

async fn raw_get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

fn memory_router() -> Router {
    let cache = Arc::new(MemoryCache::new());
    let users = UserCoordinator::new(
        Arc::new(MemoryUserStore::new()),
        cache.clone(),
        CoordinatorOptions::default(),
    );
    let config = AppConfig::default();
    create_router(
        AppState::new(Arc::new(users), cache),
        &config.server,
        &config.observability,
    )
}

#[tokio::test]
async fn test_serves_until_signalled() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(serve(
        listener,
        memory_router(),
        Duration::from_secs(5),
        async move {
            let _ = stop_rx.await;
        },
    ));

    let response = raw_get(addr, "/live").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");

    stop_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server stopped")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_grace_period_bounds_shutdown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "done"
        }),
    );
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(serve(
        listener,
        router,
        Duration::from_millis(100),
        async move {
            let _ = stop_rx.await;
        },
    ));

    let in_flight = tokio::spawn(raw_get(addr, "/slow"));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    stop_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server stopped within the grace period")
        .unwrap();

    assert!(result.is_ok());
    assert!(started.elapsed() < Duration::from_secs(5));
    in_flight.abort();
}
