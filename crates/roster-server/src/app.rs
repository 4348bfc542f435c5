//! Backend wiring and the serve loop.

use crate::{shutdown::shutdown_signal, startup::print_startup_info};
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use roster_config::{AppConfig, CacheBackend, ObservabilityConfig};
use roster_core::{RosterError, RosterResult};
use roster_repository::{DatabasePool, PgUserStore, RecordStore};
use roster_rest::{create_router, AppState};
use roster_service::metrics::register_metrics;
use roster_service::{
    with_timeout, CacheLayer, CoordinatorOptions, MemoryCache, RedisCache, UserCoordinator,
    UserRepository,
};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// The configured cache, plus the Redis handle when one needs closing.
pub struct CacheHandles {
    pub cache: Arc<dyn CacheLayer>,
    pub redis: Option<RedisCache>,
}

/// Builds the cache backend named by `cache.backend`.
pub fn build_cache(config: &AppConfig) -> RosterResult<CacheHandles> {
    let handles = match config.cache.backend {
        CacheBackend::Redis => {
            let redis = RedisCache::from_config(&config.redis)?;
            CacheHandles {
                cache: Arc::new(redis.clone()),
                redis: Some(redis),
            }
        }
        CacheBackend::Memory => CacheHandles {
            cache: Arc::new(MemoryCache::new()),
            redis: None,
        },
        CacheBackend::Disabled => CacheHandles {
            cache: Arc::new(RedisCache::disabled()),
            redis: None,
        },
    };

    info!("Cache backend: {}", handles.cache.backend_name());
    Ok(handles)
}

/// Pings the cache once. An unreachable cache is reported, never fatal.
pub async fn check_cache(cache: &dyn CacheLayer, timeout: Duration) -> bool {
    match with_timeout(timeout, || cache.ping()).await {
        Ok(()) => {
            info!("{} cache reachable", cache.backend_name());
            true
        }
        Err(e) => {
            warn!(
                "{} cache unreachable, serving from the store only: {}",
                cache.backend_name(),
                e
            );
            false
        }
    }
}

/// Installs the global Prometheus recorder when metrics are enabled.
pub fn install_metrics(config: &ObservabilityConfig) -> RosterResult<Option<PrometheusHandle>> {
    if !config.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        RosterError::Configuration(format!("Failed to install Prometheus recorder: {}", e))
    })?;
    register_metrics();

    info!("Prometheus metrics exposed at {}", config.metrics_path);
    Ok(Some(handle))
}

/// Live backends behind the HTTP adapter.
pub struct Backends {
    pub users: Arc<dyn UserRepository>,
    pub cache: Arc<dyn CacheLayer>,
    pool: Arc<DatabasePool>,
    redis: Option<RedisCache>,
}

impl Backends {
    /// Opens the Postgres pool, runs migrations, and builds the cache and coordinator.
    pub async fn connect(config: &AppConfig) -> RosterResult<Self> {
        let pool = Arc::new(DatabasePool::new(&config.database).await?);

        if config.database.run_migrations {
            if let Err(e) = pool.run_migrations().await {
                pool.close().await;
                return Err(e);
            }
        }

        let CacheHandles { cache, redis } = match build_cache(config) {
            Ok(handles) => handles,
            Err(e) => {
                pool.close().await;
                return Err(e);
            }
        };
        check_cache(cache.as_ref(), config.redis.operation_timeout()).await;

        let store: Arc<dyn RecordStore> = Arc::new(PgUserStore::new(Arc::clone(&pool)));
        let users: Arc<dyn UserRepository> = Arc::new(UserCoordinator::new(
            store,
            Arc::clone(&cache),
            CoordinatorOptions::from_config(config),
        ));

        Ok(Self {
            users,
            cache,
            pool,
            redis,
        })
    }

    /// Closes the database and Redis pools.
    pub async fn close(&self) {
        if let Some(redis) = &self.redis {
            redis.close();
        }
        self.pool.close().await;
        info!("Backend connections closed");
    }
}

/// Serves `router` until `signal` resolves, then gives in-flight requests
/// `grace` to finish before dropping them.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    grace: Duration,
    signal: F,
) -> RosterResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        signal.await;
        let _ = signalled_tx.send(());
    });
    let mut server = tokio::spawn(server.into_future());

    let grace_period = async move {
        if signalled_rx.await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        biased;

        result = &mut server => match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(RosterError::internal(format!("REST server error: {}", e))),
            Err(e) => Err(RosterError::internal(format!("REST server task failed: {}", e))),
        },
        () = grace_period => {
            warn!("Shutdown grace period of {:?} elapsed, dropping in-flight requests", grace);
            server.abort();
            Ok(())
        }
    }
}

/// Runs the server until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> RosterResult<()> {
    let metrics = install_metrics(&config.observability)?;
    let backends = Backends::connect(&config).await?;

    let mut state = AppState::new(Arc::clone(&backends.users), Arc::clone(&backends.cache));
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }
    let router = create_router(state, &config.server, &config.observability);

    let addr = config.server.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            backends.close().await;
            return Err(RosterError::internal(format!(
                "Failed to bind REST on {}: {}",
                addr, e
            )));
        }
    };

    print_startup_info(&config);
    info!("Starting REST server on http://{}", addr);

    let result = serve(
        listener,
        router,
        config.server.shutdown_grace(),
        shutdown_signal(),
    )
    .await;

    backends.close().await;
    info!("Server shutdown complete");
    result
}
