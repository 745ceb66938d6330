use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use copelk_core::{
    load_config, load_config_from_env, run_polling, validate_config, BetterCopeClient, Bot,
    ChatApi, Config, QueryDispatcher, ResponseFormatter, RoutingTable, SubtitleApi,
    TelegramClient,
};
use copelk_server::api::create_router;
use copelk_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file used when `COPELK_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Pause after a failed getUpdates call.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_logging();
    info!("Starting copelk-bot v{}", VERSION);

    let config = load()?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Subtitle API: {}", config.subtitle_api.base_url);

    let subtitle_api: Arc<dyn SubtitleApi> = Arc::new(
        BetterCopeClient::new(&config.subtitle_api)
            .context("Failed to create subtitle API client")?,
    );
    let chat: Arc<dyn ChatApi> = Arc::new(
        TelegramClient::new(&config.telegram).context("Failed to create Telegram client")?,
    );

    let dispatcher = QueryDispatcher::new(
        subtitle_api,
        ResponseFormatter::new(&config.limits),
        config.subtitle_api.host.clone(),
    );
    let bot = Bot::new(RoutingTable::standard(), dispatcher, chat);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let server = if config.server.enabled {
        let addr = SocketAddr::new(config.server.host, config.server.port);
        info!("Starting server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;
        let app = create_router(Arc::new(AppState::new(config.clone())));

        let mut server_shutdown = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = server_shutdown.wait_for(|stop| *stop).await;
                })
                .await
        }))
    } else {
        info!("HTTP server disabled");
        None
    };

    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    run_polling(
        &bot,
        config.telegram.poll_timeout_secs,
        POLL_ERROR_BACKOFF,
        shutdown_rx,
    )
    .await;

    if let Some(handle) = server {
        handle
            .await
            .context("Server task panicked")?
            .context("Server error")?;
    }

    info!("Shut down cleanly");
    Ok(())
}

/// `RUST_LOG` filters; `COPELK_LOG_FORMAT=json` switches to JSON lines.
fn init_logging() {
    let json = std::env::var("COPELK_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into()))
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

/// An explicit `COPELK_CONFIG` must exist. Without it, `config.toml` is used
/// when present, otherwise defaults plus environment.
fn load() -> Result<Config> {
    match std::env::var("COPELK_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        Err(_) => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if path.exists() {
                info!("Loading configuration from {:?}", path);
                load_config(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))
            } else {
                info!("No config file, using environment");
                load_config_from_env().context("Failed to load config from environment")
            }
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
