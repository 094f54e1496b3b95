mod accounts;
mod analysis;
mod config;
mod errors;
mod resumes;
mod rooms;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::accounts::AccountStore;
use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::resumes::ResumeVault;
use crate::rooms::RoomStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStore, MemoryStore, SharedStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Prep API v{}", env!("CARGO_PKG_VERSION"));

    // One backing store shared by both stores
    let store: SharedStore = if config.ephemeral_storage {
        warn!("EPHEMERAL_STORAGE is set: accounts and rooms are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::open(&config.data_dir)?)
    };
    let accounts = AccountStore::new(store.clone());
    let rooms = RoomStore::new(store);
    let resumes = ResumeVault::open(config.resumes_dir())?;
    info!(
        "Storage ready under {} ({} registered account(s))",
        config.data_dir.display(),
        accounts.count()?
    );

    // Initialize analysis client
    let analyzer = AnalysisClient::new(
        config.analysis_url.clone(),
        config.retry_policy(),
        config.analysis_timeout,
    )?;
    info!(
        "Analysis client initialized (endpoint: {}, attempts: {})",
        analyzer.url(),
        config.retry_policy().max_attempts
    );

    let state = AppState {
        accounts,
        rooms,
        resumes,
        analyzer: Arc::new(analyzer),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
