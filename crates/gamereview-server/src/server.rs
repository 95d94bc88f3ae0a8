//! Server lifecycle: pool, catalog, listener and graceful shutdown.

use crate::routes;
use crate::state::AppState;
use gamereview_adapter_pg::{connect_pool, introspect};
use gamereview_core::GameReviewConfig;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

/// Build the pool and load the catalog.
pub async fn prepare(config: &GameReviewConfig) -> anyhow::Result<(AppState, PgPool)> {
    let pool = connect_pool(&config.database, &config.catalog)?;
    let catalog = introspect::load_catalog(&pool, &config.catalog).await?;
    for table in catalog.tables() {
        info!(table = %table.name, columns = table.columns.len(), "whitelisted table");
    }
    let state = AppState::from_pool(pool.clone(), catalog, &config.query);
    Ok((state, pool))
}

/// Serve HTTP until SIGINT/SIGTERM, then drain in-flight requests and close
/// the pool, each bounded by `server.shutdown_grace_seconds`.
pub async fn run(config: GameReviewConfig) -> anyhow::Result<()> {
    let (state, pool) = prepare(&config).await?;
    let app = routes::create_router(state);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "gamereview listening");

    let stop = Arc::new(Notify::new());
    let mut server = tokio::spawn({
        let stop = stop.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.notified().await })
                .await
        }
    });

    tokio::select! {
        finished = &mut server => {
            finished??;
            pool.close().await;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    let grace = config.server.shutdown_grace();
    info!(grace_seconds = grace.as_secs(), "shutdown signal received, draining");
    stop.notify_one();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(finished) => finished??,
        Err(_) => {
            warn!("in-flight requests still running after grace period, aborting");
            server.abort();
        }
    }

    if tokio::time::timeout(grace, pool.close()).await.is_err() {
        warn!("connection pool did not close within grace period");
    } else {
        info!("connection pool closed");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
