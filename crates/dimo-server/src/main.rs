mod api;
mod middleware;
mod scheduler;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dimo_db::PgCatalog;
use dimo_recsys::RecsysClient;
use dimo_search::{CatalogSnapshot, DisabledRanker, PersonalizedRanker, SearchEngine, SharedCatalog};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(dimo_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = dimo_db::PoolConfig::from_app_config(&config);
    let pool = dimo_db::connect_pool(&config.database_url, pool_config).await?;
    dimo_db::run_migrations(&pool).await?;

    let ranking_timeout = Duration::from_millis(config.recsys_timeout_ms);
    let ranker: Arc<dyn PersonalizedRanker> = match &config.recsys_url {
        Some(url) => Arc::new(RecsysClient::new(url, ranking_timeout)?),
        None => {
            tracing::warn!("DIMO_RECSYS_URL not set; brands will be ranked by popularity");
            Arc::new(DisabledRanker)
        }
    };

    let pg = Arc::new(PgCatalog::new(pool.clone()));
    let engine = SearchEngine::new(pg.clone(), pg.clone(), ranker, ranking_timeout);

    let snapshot = CatalogSnapshot::load(pg.as_ref()).await?;
    tracing::info!(stores = snapshot.len(), "catalog snapshot loaded");
    let catalog = SharedCatalog::new(snapshot);

    let _scheduler = scheduler::build_scheduler(
        config.catalog_refresh_cron.as_deref(),
        catalog.clone(),
        pg,
    )
    .await?;

    let state = AppState {
        pool,
        catalog,
        engine,
        store_logo_url: Arc::from(config.store_logo_url.as_str()),
    };
    let app = build_app(state, RateLimitState::per_minute(config.rate_limit_per_minute));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "dimo-server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
