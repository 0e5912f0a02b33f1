//! Interaction Endpoint - HTTP server for signed interaction webhooks.
//!
//! Configuration is read once here and handed to every request through
//! [`AppState`]. Missing identity or key does not stop startup; requests
//! answer 500 until both are set.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interactions::web::router;
use interactions::{AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env();
    report_config(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(config)).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind interaction endpoint to {addr}"))?;

    info!(address = %addr, "interaction_endpoint_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Interaction endpoint server error")?;

    info!("interaction_endpoint_stopped");

    Ok(())
}

/// JSON logs, filtered by `RUST_LOG` with `info` as the fallback.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();
}

fn report_config(config: &Config) {
    info!(
        port = config.port,
        application_id_set = config.application_id.is_some(),
        public_key_set = config.application_public_key.is_some(),
        "interaction_config_loaded"
    );

    for missing in [
        config.application_id().err(),
        config.application_public_key().err(),
    ]
    .into_iter()
    .flatten()
    {
        warn!(error = %missing, "interaction_config_missing");
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "sigint_listener_unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_listener_unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    info!(signal = signal_name, "interaction_endpoint_draining");
}
