//! HTTP server initialization and runtime setup.
//!
//! Handles store and cache connections, service wiring, and the Axum server
//! lifecycle.

use crate::application::services::AllocationService;
use crate::config::{Config, StoreBackend};
use crate::domain::repositories::RecordStore;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{MemoryRecordStore, PgRecordStore};
use crate::routes::app_router;
use crate::state::{AppState, DynAllocationService};
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the configured record store.
///
/// For PostgreSQL this builds the connection pool from the `DB_*` pool
/// settings and, unless `RUN_MIGRATIONS=false`, applies the bundled
/// migrations before returning.
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// table name is rejected.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records are lost on restart");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            if config.run_migrations {
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run migrations")?;
                tracing::info!("Migrations applied");
            }

            let store = PgRecordStore::new(Arc::new(pool), &config.table_name)?;
            Ok(Arc::new(store))
        }
    }
}

/// Connects the record cache, falling back to [`NullCache`] when Redis is
/// not configured or cannot be reached.
pub async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Builds the allocation service over `store` with the configured code
/// length, attempt limit and short URL base.
pub fn build_allocation_service(
    config: &Config,
    store: Arc<dyn RecordStore>,
) -> DynAllocationService {
    let generator: Arc<dyn CodeGenerator> = Arc::new(RandomCodeGenerator::new(config.code_length));

    AllocationService::new(store, generator)
        .with_max_attempts(config.max_allocation_attempts)
        .with_short_url_base(config.short_url_base.clone())
}

/// Wires the shared application state from already-connected clients.
///
/// # Errors
///
/// Returns an error if `CORS_ALLOW_ORIGIN` is not a valid header value.
pub fn build_state(
    config: &Config,
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn CacheService>,
) -> Result<AppState> {
    let allocation_service = build_allocation_service(config, store.clone());

    Ok(AppState::new(store, cache, allocation_service)
        .with_cors_allow_origin(config.cors_origin_header()?))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Record store (PostgreSQL pool + migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Allocation and redirect services
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Store connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;
    let cache = connect_cache(&config).await;
    let state = build_state(&config, store, cache)?;

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
