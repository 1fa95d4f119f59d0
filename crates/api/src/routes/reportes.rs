//! Route definitions for the `/reportes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reportes;
use crate::state::AppState;

/// Routes mounted at `/reportes`.
///
/// ```text
/// GET  /disponibles             -> visible reports
/// GET  /{codigo}/datos          -> filtered rows
/// GET  /{codigo}/estadisticas   -> load stats
/// GET  /{codigo}/descargar      -> upload template
/// POST /{codigo}/upload         -> ingest workbook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/disponibles", get(reportes::disponibles))
        .route("/{codigo}/datos", get(reportes::datos))
        .route("/{codigo}/estadisticas", get(reportes::estadisticas))
        .route("/{codigo}/descargar", get(reportes::descargar))
        .route("/{codigo}/upload", post(reportes::upload))
}
