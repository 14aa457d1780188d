mod backend;
mod config;
mod editor;
mod errors;
mod export;
mod forms;
mod models;
mod render;
mod routes;
mod state;
mod store;
mod text;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::BackendClient;
use crate::config::Config;
use crate::editor::registry::SessionRegistry;
use crate::routes::build_router;
use crate::state::AppState;

const SWEEP_EVERY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CVSwitch editor v{}", env!("CARGO_PKG_VERSION"));

    let backend = BackendClient::new(&config.backend_url)?;
    info!("Backend client initialized ({})", config.backend_url);
    if let Some(dir) = &config.download_dir {
        info!("Exports are also written to {}", dir.display());
    }

    let sessions = SessionRegistry::default();
    sessions.spawn_sweeper(config.session_idle, SWEEP_EVERY);

    let state = AppState {
        config: config.clone(),
        backend: Arc::new(backend),
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
