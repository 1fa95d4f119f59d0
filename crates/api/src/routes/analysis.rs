//! Route definitions for the `/analysis` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::analysis;
use crate::state::AppState;

/// Routes mounted at `/analysis`.
///
/// ```text
/// POST /{codigo}/pregunta  -> Q&A over the report's data
/// POST /{codigo}/indexar   -> rebuild the semantic index
/// GET  /{codigo}/analisis  -> canned analysis (?tipo=)
/// POST /{codigo}/informe   -> full multi-section informe
/// GET  /{codigo}/buscar    -> semantic search (?q=&limite=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{codigo}/pregunta", post(analysis::pregunta))
        .route("/{codigo}/indexar", post(analysis::indexar))
        .route("/{codigo}/analisis", get(analysis::analisis))
        .route("/{codigo}/informe", post(analysis::generar_informe))
        .route("/{codigo}/buscar", get(analysis::buscar))
}
