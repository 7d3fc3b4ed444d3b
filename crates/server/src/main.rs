use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubetape_core::{
    load_config, validate_config, ConversionPipeline, Converter, FfmpegConverter, Fetcher,
    Id3TagWriter, ScratchSpace, YtDlpFetcher,
};
use tubetape_server::{create_router, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("TUBETAPE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("tubetape.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Scratch directory: {:?}", config.scratch.dir);
    info!("Encoding bitrate: {} kbps", config.encoding.bitrate_kbps);

    // External tools; a missing binary fails requests, not startup
    let fetcher: Arc<dyn Fetcher> = Arc::new(YtDlpFetcher::new(config.fetcher.clone()));
    let converter: Arc<dyn Converter> = Arc::new(FfmpegConverter::new(config.converter.clone()));

    match fetcher.validate().await {
        Ok(()) => info!("yt-dlp available at {:?}", config.fetcher.ytdlp_path),
        Err(e) => warn!("yt-dlp check failed, conversions will fail: {}", e),
    }
    match converter.validate().await {
        Ok(()) => info!("ffmpeg and ffprobe available"),
        Err(e) => warn!("ffmpeg check failed, trimming will fail: {}", e),
    }

    // Start from an empty scratch root
    let scratch = ScratchSpace::new(&config.scratch.dir);
    scratch
        .reset()
        .await
        .with_context(|| format!("Failed to prepare scratch directory {:?}", config.scratch.dir))?;

    let pipeline = ConversionPipeline::new(
        fetcher,
        converter,
        Arc::new(Id3TagWriter::new()),
        scratch.clone(),
        config.encoding.bitrate_kbps,
    );

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), pipeline));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    if let Err(e) = scratch.reset().await {
        warn!("Failed to purge scratch directory on shutdown: {}", e);
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
}
