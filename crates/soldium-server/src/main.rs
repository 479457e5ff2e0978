#![forbid(unsafe_code)]

use std::sync::atomic::Ordering;
use std::sync::Arc;

use soldium_core::{Clock, SystemClock};
use soldium_server::{build_router, AppState, LocalIdentityProvider, ServerConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                warn!("signal handlers unavailable; falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_json);
    config.validate()?;
    if config.uses_dev_pepper() {
        warn!("SOLDIUM_PASSWORD_PEPPER is unset; using the development pepper");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = config
        .store
        .open(Arc::clone(&clock))
        .map_err(|e| format!("store open failed: {e}"))?;
    let identity = Arc::new(LocalIdentityProvider::new(
        &config.password_pepper,
        config.session_ttl,
        Arc::clone(&clock),
    ));
    let bind_addr = config.bind_addr.clone();
    let drain = config.shutdown_drain;
    let backend = store.backend_tag();

    let state = AppState::new(config, store, identity, clock)
        .map_err(|e| format!("service startup failed: {e}"))?;
    let app = build_router(state.clone());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!(bind = %bind_addr, store = backend, "soldium-server listening");

    let ready = Arc::clone(&state.ready);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            ready.store(false, Ordering::Relaxed);
            info!(drain_ms = drain.as_millis() as u64, "shutdown signal received; draining");
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
