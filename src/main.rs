use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitness_tracker_api::{
    config::Config,
    db::{
        create_pool, create_redis_client, init_schema, seed_catalog_from_file, Cache,
        CacheWriterHandle, CachedExerciseStore, ExerciseStore, SqliteExerciseStore,
    },
    routes::{create_router, AppState},
    services::RecommendationEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitness_tracker_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    init_schema(&pool).await?;
    if let Some(seed_path) = &config.catalog_seed_path {
        seed_catalog_from_file(&pool, seed_path).await?;
    }

    let sqlite_store: Arc<dyn ExerciseStore> = Arc::new(SqliteExerciseStore::new(pool));
    let (store, cache_handle): (Arc<dyn ExerciseStore>, Option<CacheWriterHandle>) =
        match &config.redis_url {
            Some(redis_url) => {
                let client = create_redis_client(redis_url)?;
                let (cache, handle) = Cache::new(client).await;
                tracing::info!("Catalog cache enabled");
                let store = CachedExerciseStore::new(
                    sqlite_store,
                    cache,
                    config.catalog_cache_ttl_secs,
                );
                (Arc::new(store), Some(handle))
            }
            None => (sqlite_store, None),
        };

    let engine = RecommendationEngine::with_config(config.engine_config());
    let state = Arc::new(AppState::new(
        store,
        engine,
        config.default_recommendation_count,
    ));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
