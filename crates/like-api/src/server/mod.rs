//! Server setup and initialization
//!
//! Provides the application builder, dependency wiring, and the server
//! runner that owns the background engine.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use like_cache::{
    LogEventPublisher, MemoryReactionCache, RedisEventPublisher, RedisLikeCounter, RedisPool,
    RedisPoolConfig, RedisReactionCache,
};
use like_common::{AppConfig, AppError, CacheBackend};
use like_core::traits::{EventPublisher, ReactionCache};
use like_db::{create_pool, run_migrations, PgActorRepository, PgReactionStore, PgResourceResolver};
use like_service::{EngineSettings, LikeEngine, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();

    let api = apply_rate_limit(create_router(), &config.rate_limit);
    let router = api.merge(health_routes());
    let router = apply_middleware(router, &config.cors, config.app.env.is_production());

    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&like_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Migrations failed: {e}")))?;
    info!("PostgreSQL connection established");

    let (cache, publisher) = create_cache(&config)?;

    let service_context = ServiceContextBuilder::new()
        .resolver(Arc::new(PgResourceResolver::new(pool.clone())))
        .actor_repo(Arc::new(PgActorRepository::new(pool.clone())))
        .store(Arc::new(PgReactionStore::new(pool)))
        .cache(cache)
        .publisher(publisher)
        .batch_threshold(config.sync.batch_threshold)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Reaction Cache and event publisher for the configured backend
fn create_cache(
    config: &AppConfig,
) -> Result<(Arc<dyn ReactionCache>, Arc<dyn EventPublisher>), AppError> {
    match config.cache.backend {
        CacheBackend::Redis => {
            info!("Connecting to Redis...");
            let redis = RedisPool::new(RedisPoolConfig::from(&config.redis))
                .map_err(|e| AppError::Cache(e.to_string()))?;
            let counter = Arc::new(RedisLikeCounter::new(redis.clone()));
            let cache = RedisReactionCache::new(redis.clone(), counter, config.cache.ttl());
            info!("Redis pool created");
            Ok((Arc::new(cache), Arc::new(RedisEventPublisher::new(redis))))
        }
        CacheBackend::Memory => {
            warn!("Using in-process reaction cache; counts are not shared between instances");
            Ok((
                Arc::new(MemoryReactionCache::with_ttl(config.cache.ttl())),
                Arc::new(LogEventPublisher),
            ))
        }
    }
}

/// Run the HTTP server until the shutdown signal resolves
pub async fn run_server(
    app: Router,
    addr: SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
///
/// The background engine starts before the listener and is stopped after
/// the server drains, with a final flush of pending jobs.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let engine = LikeEngine::start(
        state.service_context(),
        &EngineSettings::from(state.config()),
    );

    let app = create_app(state);
    let served = run_server(app, addr, shutdown_signal()).await;

    let report = engine.shutdown().await;
    if report.failed > 0 {
        warn!(
            failed = report.failed,
            "Pending likes could not be written before shutdown"
        );
    }

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received");
}
