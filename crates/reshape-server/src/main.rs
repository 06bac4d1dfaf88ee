//! Reshape server entry point

use anyhow::Context;
use reshape_server::config::ServerConfig;
use reshape_server::{app, logging, routes::meta};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = ServerConfig::from_env();
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        version = meta::VERSION,
        %addr,
        "reshape v{} listening on {}",
        meta::VERSION,
        addr
    );
    tracing::info!("POST /api/transform  - convert between JSON, CSV, XML, YAML, TOML");
    tracing::info!("POST /api/flatten    - flatten nested JSON into dot-notation keys");
    tracing::info!("POST /api/unflatten  - expand dot-notation keys back into objects");
    tracing::info!("POST /api/query      - query JSON with JMESPath");
    tracing::info!("POST /api/diff       - compare two JSON documents");
    tracing::info!("POST /api/validate   - validate JSON against a JSON Schema");

    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM so in-flight requests can drain.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT received, shutting down gracefully"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down gracefully"),
    }
}
