use std::sync::Arc;

use crate::analysis::service::Analyzer;
use crate::config::Config;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Oracle-backed operations plus their process-wide result caches.
    pub analyzer: Analyzer,
    /// In-memory user sessions holding batch rankings.
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}
