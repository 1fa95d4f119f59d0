use std::sync::Arc;

use informes_analysis::LlmClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: informes_db::DbPool,
    /// Server configuration (JWT secret, CORS, timeouts).
    pub config: Arc<ServerConfig>,
    /// LLM client for the analysis endpoints. Usable even without an API
    /// key: calls then fail with a structured 503.
    pub llm: Arc<LlmClient>,
}
