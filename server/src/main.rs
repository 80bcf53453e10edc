mod error;
mod handlers;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use node_call_bridge::{config::parse_flag, AppSession, BridgeConfig};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<AppSession>,
}

/// Config file (if any) first, then build-flag style env overrides.
fn load_config() -> anyhow::Result<BridgeConfig> {
    let mut config = match std::env::var("NODE_BRIDGE_CONFIG") {
        Ok(path) => BridgeConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        Err(_) => BridgeConfig::default(),
    };

    if let Ok(value) = std::env::var("DEBUG") {
        config.debug_mode = parse_flag(&value);
    }
    if let Ok(value) = std::env::var("ETHEREUM_DEV_CLUSTER") {
        config.developer_cluster = parse_flag(&value);
    }
    if let Ok(value) = std::env::var("DEBUG_WEBVIEW") {
        config.webview_debug = parse_flag(&value);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "node_bridge_gateway=debug,node_call_bridge=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from env
    dotenvy::dotenv().ok();
    let config = load_config()?;
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    tracing::info!("Network: {}", config.network_name());
    tracing::info!("Node backend: {:?}", config.node.backend);

    let session = AppSession::init(config).context("Failed to initialize session")?;
    session.start().context("Failed to start node")?;
    let state = AppState {
        session: Arc::new(session),
    };

    let app = Router::new()
        .route("/rpc", post(handlers::call_rpc))
        .route("/v1/status", get(handlers::get_status))
        .with_state(state.clone())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind to port {}", port))?;

    tracing::info!("Gateway listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server failed")?;

    state.session.shutdown();
    Ok(())
}
