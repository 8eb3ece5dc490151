//! reqloc agent
//!
//! - Local API for the co-located service to report requests
//! - Periodic flush of accumulated counts to the monitor
//! - Registry register / heartbeat / deregister around the process lifetime

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use reqloc_agent::registry::{NoopRegistry, RegistryClient};
use reqloc_agent::transport::{HttpTransport, PushTransport};
use reqloc_agent::{agent_state, config, router};
use reqloc_core::error::{Result, ReqlocError};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "reqloc-agent failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("REQLOC_AGENT_CONFIG").unwrap_or_else(|_| config::DEFAULT_PATH.into());
    let cfg = config::load_or_default(&path)?;
    let listen: SocketAddr = cfg
        .agent
        .listen
        .parse()
        .map_err(|e| ReqlocError::BadRequest(format!("agent.listen must be a valid SocketAddr: {e}")))?;

    let transport: Arc<dyn PushTransport> = Arc::new(HttpTransport::new(
        cfg.agent.monitor_url.clone(),
        Duration::from_millis(cfg.agent.push_timeout_ms),
    )?);

    let registry_client: Arc<dyn RegistryClient> = Arc::new(NoopRegistry);
    let auto_register = cfg.registry.auto_register;

    let state = agent_state::AgentState::with_registry(cfg, registry_client);
    let flusher = state.flusher(transport).spawn();

    if auto_register {
        // failure is logged; POST /api/register can retry it
        let _ = state.registration().register().await;
    } else {
        tracing::info!("waiting for POST /api/register to register the instance");
    }

    let app = router::build_router(state.clone());
    tracing::info!(%listen, "reqloc-agent starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ReqlocError::Internal(format!("failed to bind {listen}: {e}")))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ReqlocError::Internal(format!("server failed: {e}")));

    flusher.stop().await;
    if let Err(e) = state.registration().deregister().await {
        tracing::debug!(error = %e, "nothing to deregister");
    }
    tracing::info!("reqloc-agent stopped");
    served
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
