mod bootstrap;
mod customers;
mod error;
mod health;
mod products;
mod routes;
#[cfg(test)]
mod test_support;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cadastro_core::config::{AppConfig, LoadOptions};
use tokio::sync::Notify;

fn init_logging(config: &AppConfig) {
    use cadastro_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap(config).await?;
    let address = app.config.listen_address();
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {address}"))?;
    tracing::info!(
        event_name = "system.server.started",
        listen_address = %address,
        "cadastro-server listening on http://{address}"
    );

    let shutdown = Arc::new(Notify::new());
    let signal = Arc::clone(&shutdown);
    let server = axum::serve(listener, routes::app(app.db_pool.clone()))
        .with_graceful_shutdown(async move { signal.notified().await })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.context("HTTP server terminated unexpectedly")?;
        }
        signal = wait_for_shutdown() => {
            signal?;
            tracing::info!(
                event_name = "system.server.stopping",
                grace_secs = grace.as_secs(),
                "shutdown requested, draining in-flight requests"
            );
            shutdown.notify_one();
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result.context("HTTP server failed while draining")?,
                Err(_) => tracing::warn!(
                    event_name = "system.server.drain_timeout",
                    "in-flight requests did not finish within the grace period"
                ),
            }
        }
    }

    app.db_pool.close().await;
    tracing::info!(event_name = "system.server.stopped", "cadastro-server stopped");
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
