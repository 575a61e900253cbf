use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pitwall_core::{
    load_config, validate_config, AtomicFileWriter, AzureOpenAiClient, AzureVideoClient,
    JobTemplate, LlmClient, PollerConfig, SanitizedConfig, VideoJobApi, VideoPipeline,
};
use pitwall_server::api::create_router;
use pitwall_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    let json = std::env::var("PITWALL_LOG_FORMAT").is_ok_and(|f| f == "json");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run() -> Result<()> {
    init_tracing();

    // Determine config path
    let config_path = std::env::var("PITWALL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        video_path = %config.storage.video_path.display(),
        "Configuration loaded successfully"
    );

    // Chat relay
    let llm: Arc<dyn LlmClient> =
        Arc::new(AzureOpenAiClient::new(&config.llm).context("Failed to create LLM client")?);
    info!(
        provider = llm.provider(),
        deployment = llm.model(),
        "LLM client initialized"
    );
    if !config.llm.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
        warn!("llm.api_key is not set; question requests will answer 503");
    }

    // Video generation
    let video_api: Arc<dyn VideoJobApi> = Arc::new(
        AzureVideoClient::new(&config.video).context("Failed to create video client")?,
    );
    let pipeline = Arc::new(VideoPipeline::new(
        video_api,
        PollerConfig::from(&config.video),
        AtomicFileWriter::new(config.storage.chunk_size_bytes),
        config.storage.video_path.clone(),
        JobTemplate::from(&config.video),
    ));
    info!(
        model = %config.video.model,
        max_wait_secs = config.video.max_wait_secs,
        poll_interval_secs = config.video.poll_interval_secs,
        "Video pipeline initialized"
    );

    let addr = SocketAddr::new(config.server.host, config.server.port);

    // Create app state
    let state = Arc::new(AppState::new(config, llm, pipeline));

    // Create router
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");

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

    info!("Shutdown signal received");
}
