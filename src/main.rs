// vision-relay - OpenAI-compatible proxy that folds top-level images into multimodal messages

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use vision_relay::cli::Args;
use vision_relay::config::AppConfig;
use vision_relay::server::create_router;
use vision_relay::upstream::UpstreamClient;
use vision_relay::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting vision-relay v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Upstream {} (model tag {}, api key {}, timeout {}s)",
        config.upstream.api_base_url,
        config.upstream.model_name,
        logging::mask_secret(&config.upstream.api_key),
        config.upstream.timeout_seconds
    );

    // Phase 3: Build the pooled upstream client
    let upstream = UpstreamClient::new(&config.upstream)?;

    // Phase 4: Build and start HTTP server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    let app = create_router(config, upstream)?;

    info!("Starting server on {}", listener.local_addr()?);

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
