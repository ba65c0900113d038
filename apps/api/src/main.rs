mod analysis;
mod config;
mod errors;
mod models;
mod oracle;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::service::Analyzer;
use crate::config::Config;
use crate::oracle::GeminiClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing API key stops startup here.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the Gemini client
    let gemini = GeminiClient::new(
        config.google_api_key.clone(),
        config.gemini_api_base.clone(),
        Duration::from_secs(config.oracle_timeout_secs),
    )?;
    let analyzer = Analyzer::new(Arc::new(gemini), config.gemini_model.clone());
    info!("Gemini client initialized (model: {})", analyzer.model());

    let sessions = Arc::new(SessionStore::new(chrono::Duration::minutes(i64::from(
        config.session_idle_minutes,
    ))));
    spawn_session_sweeper(sessions.clone());

    let state = AppState {
        analyzer,
        sessions,
        config: config.clone(),
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

/// Periodically discards sessions that have sat idle past their limit.
fn spawn_session_sweeper(sessions: Arc<SessionStore>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let dropped = sessions.sweep_idle(chrono::Utc::now());
            if dropped > 0 {
                info!("Discarded {dropped} idle sessions");
            }
        }
    });
}
