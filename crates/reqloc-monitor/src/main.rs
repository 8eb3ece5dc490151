//! reqloc monitor
//!
//! - POST /api/monitoring : ingest pushed location request counts
//! - GET  /api/monitoring : raw records, or `?aggregation[&interval=secs]`
//! - GET  /healthz
//! - Retention sweep running alongside the server

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use reqloc_core::error::{Result, ReqlocError};
use reqloc_monitor::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "reqloc-monitor failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("REQLOC_MONITOR_CONFIG").unwrap_or_else(|_| config::DEFAULT_PATH.into());
    let cfg = config::load_or_default(&path)?;
    let listen: SocketAddr = cfg
        .monitor
        .listen
        .parse()
        .map_err(|e| ReqlocError::BadRequest(format!("monitor.listen must be a valid SocketAddr: {e}")))?;

    let state = app_state::AppState::new(cfg);
    let pruner = state.spawn_pruner();
    let app = router::build_router(state);

    tracing::info!(%listen, "reqloc-monitor starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ReqlocError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ReqlocError::Internal(format!("server failed: {e}")))?;

    if let Some(pruner) = pruner {
        pruner.stop().await;
    }
    tracing::info!("reqloc-monitor stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, starting graceful shutdown");
}
